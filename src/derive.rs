//! Automaton to expression, by Brzozowski's algebraic method.
//!
//! Every state `i` gets an equation `X[i] = B[i] | A[i][0] X[0] | ... | A[i][n-1] X[n-1]`,
//! where `B[i]` is the empty literal for accepting states and `A[i][j]`
//! labels the transitions from `i` to `j`. Variables are eliminated from the
//! last index down; `B[0]` is then the expression for the start state.
//!
//! "No expression" is `None` throughout: it absorbs `concat` and `star` and is
//! the identity of `union`. Simplification happens inside `union` and
//! `concat` as terms are built, not as a separate pass.

use {
    crate::{
        ast::{Quantifier, Regex, Side},
        dfa::Dfa,
    },
    log::debug,
    vec_map::VecMap,
};

/// Returns an expression for the language of `dfa`, or `None` if it accepts
/// nothing.
pub fn derive(dfa: &Dfa) -> Option<Regex> {
    let states = dfa.visit();
    let n = states.len();
    if !dfa.is_acyclic() {
        debug!("Automaton has a cycle; loops become starred terms");
    }
    debug!("Eliminating {n} states");

    let mut index = VecMap::with_capacity(dfa.num_states());
    for (i, &s) in states.iter().enumerate() {
        index.insert(s, i);
    }

    let mut b: Vec<Option<Regex>> = Vec::with_capacity(n);
    // a[i] is sparse: a[i][j] is present only if some transition leads from i to j
    let mut a: Vec<VecMap<Regex>> = Vec::with_capacity(n);
    for &s in &states {
        let state = dfa.state(s);
        b.push(state.accepting.then(Regex::empty));
        let mut row = VecMap::new();
        for (&c, &target) in &state.by_char {
            let j = index[target];
            let term = union(row.remove(j), Some(Regex::literal(c)));
            if let Some(term) = term {
                row.insert(j, term);
            }
        }
        a.push(row);
    }

    for k in (0..n).rev() {
        if let Some(self_loop) = a[k].remove(k) {
            let loop_star = star(Some(self_loop));
            b[k] = concat(loop_star.clone(), b[k].take());
            let row: Vec<usize> = a[k].keys().filter(|&j| j < k).collect();
            for j in row {
                let term = concat(loop_star.clone(), a[k].remove(j));
                set(&mut a[k], j, term);
            }
        }

        let b_k = b[k].clone();
        let row_k: Vec<(usize, Regex)> = a[k].iter().filter(|&(j, _)| j < k).map(|(j, x)| (j, x.clone())).collect();
        for i in 0..k {
            let Some(a_ik) = a[i].remove(k) else {
                continue;
            };
            b[i] = union(b[i].take(), concat(Some(a_ik.clone()), b_k.clone()));
            for (j, a_kj) in &row_k {
                let term = union(a[i].remove(*j), concat(Some(a_ik.clone()), Some(a_kj.clone())));
                set(&mut a[i], *j, term);
            }
        }
    }

    b.into_iter().next().flatten()
}

fn set(row: &mut VecMap<Regex>, j: usize, term: Option<Regex>) {
    match term {
        Some(term) => {
            row.insert(j, term);
        }
        None => {
            row.remove(j);
        }
    }
}

fn star(x: Option<Regex>) -> Option<Regex> {
    x.map(|x| Regex::repetition(x, Quantifier::Star))
}

fn concat(a: Option<Regex>, b: Option<Regex>) -> Option<Regex> {
    let (a, b) = (a?, b?);
    if a.is_empty_literal() {
        return Some(b);
    }
    if b.is_empty_literal() {
        return Some(a);
    }
    Some(match (a, b) {
        (Regex::Literal(x), Regex::Literal(y)) => Regex::Literal(x + &y),
        // keep literal runs flat: "a" . ("b" . r) => "ab" . r
        (Regex::Literal(x), Regex::Concatenation(l, r)) => match *l {
            Regex::Literal(y) => Regex::Concatenation(Box::new(Regex::Literal(x + &y)), r),
            l => Regex::concatenation(Regex::Literal(x), Regex::Concatenation(Box::new(l), r)),
        },
        // (l . "a") . "b" => l . "ab"
        (Regex::Concatenation(l, r), Regex::Literal(y)) => match *r {
            Regex::Literal(x) => Regex::Concatenation(l, Box::new(Regex::Literal(x + &y))),
            r => Regex::concatenation(Regex::Concatenation(l, Box::new(r)), Regex::Literal(y)),
        },
        (a, b) => Regex::concatenation(a, b),
    })
}

fn union(a: Option<Regex>, b: Option<Regex>) -> Option<Regex> {
    match (a, b) {
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(a), Some(b)) => Some(merge(a, b)),
        (a, b) => a.or(b),
    }
}

/// Unions two distinct expressions, factoring out common literal affixes.
fn merge(a: Regex, b: Regex) -> Regex {
    let (a, b, prefix) = remove_common_affix(a, b, Side::Start);
    let (a, b, suffix) = remove_common_affix(a, b, Side::End);

    let mut result = if a.is_empty_literal() && b.is_empty_literal() {
        return Regex::Literal(prefix + &suffix);
    } else if a.is_empty_literal() {
        Regex::repetition(b, Quantifier::Optional)
    } else if b.is_empty_literal() {
        Regex::repetition(a, Quantifier::Optional)
    } else {
        match (a, b) {
            (Regex::Repetition(x, Quantifier::Optional), b) => {
                Regex::repetition(Regex::alternation(*x, b), Quantifier::Optional)
            }
            (a, Regex::Repetition(x, Quantifier::Optional)) => {
                Regex::repetition(Regex::alternation(a, *x), Quantifier::Optional)
            }
            (a, b) => match (a.class_members(), b.class_members()) {
                (Some(x), Some(y)) => Regex::char_class(x, y),
                _ => Regex::alternation(a, b),
            },
        }
    };
    if !prefix.is_empty() {
        result = Regex::concatenation(Regex::Literal(prefix), result);
    }
    if !suffix.is_empty() {
        result = Regex::concatenation(result, Regex::Literal(suffix));
    }
    result
}

/// Strips the longest literal shared by `a` and `b` at `side`, returning the
/// remainders and the stripped text.
fn remove_common_affix(a: Regex, b: Regex, side: Side) -> (Regex, Regex, String) {
    let common = match (a.literal_at(side), b.literal_at(side)) {
        (Some(x), Some(y)) => common_affix(x, y, side),
        _ => String::new(),
    };
    if common.is_empty() {
        return (a, b, common);
    }
    let len = common.chars().count();
    let a = a.remove_substring(side, len).unwrap_or(a);
    let b = b.remove_substring(side, len).unwrap_or(b);
    (a, b, common)
}

fn common_affix(x: &str, y: &str, side: Side) -> String {
    match side {
        Side::Start => x.chars().zip(y.chars()).take_while(|(p, q)| p == q).map(|(p, _)| p).collect(),
        Side::End => {
            let mut common: Vec<char> =
                x.chars().rev().zip(y.chars().rev()).take_while(|(p, q)| p == q).map(|(p, _)| p).collect();
            common.reverse();
            common.into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    fn lit(s: &str) -> Option<Regex> {
        Some(Regex::literal(s))
    }

    fn show(r: Option<Regex>) -> String {
        r.map(|r| r.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_concat_folds_literals() {
        assert_eq!(concat(lit("ab"), lit("cd")), lit("abcd"));
        assert_eq!(concat(lit(""), lit("x")), lit("x"));
        assert_eq!(concat(lit("x"), None), None);

        let tail = Regex::concatenation(Regex::literal("b"), Regex::char_class(vec!['c'], vec!['d']));
        assert_eq!(show(concat(lit("a"), Some(tail.clone()))), "ab[cd]");
        assert_eq!(
            concat(lit("a"), Some(tail)),
            Some(Regex::concatenation(Regex::literal("ab"), Regex::char_class(vec!['c'], vec!['d'])))
        );
    }

    #[test]
    fn test_union_factors_affixes() {
        assert_eq!(show(union(lit("foobar"), lit("foozap"))), "foo(?:bar|zap)");
        assert_eq!(show(union(lit("zapfoo"), lit("barfoo"))), "(?:zap|bar)foo");
        assert_eq!(show(union(lit("foo"), lit("foobar"))), "foo(?:bar)?");
        assert_eq!(show(union(lit("a"), lit("b"))), "[ab]");
        assert_eq!(show(union(lit("xay"), lit("xby"))), "x[ab]y");
        assert_eq!(union(lit("same"), lit("same")), lit("same"));
        assert_eq!(union(None, lit("b")), lit("b"));
        assert_eq!(union(None, None), None);
    }

    #[test]
    fn test_union_merges_into_existing_optional() {
        let opt = union(lit(""), lit("l"));
        assert_eq!(show(opt.clone()), "l?");
        assert_eq!(show(union(opt, lit("bar"))), "(?:bar|l)?");
    }

    #[test]
    fn test_derive_handles_self_loops() {
        // 0 -a-> 1, 1 -b-> 1, 1 accepting
        let mut dfa = Dfa::new();
        let s = dfa.add_state();
        dfa.set_transition(0, 'a', s);
        dfa.set_transition(s, 'b', s);
        dfa.set_accepting(s, true);
        assert_eq!(show(derive(&dfa)), "ab*");

        let mut dfa = Dfa::new();
        dfa.set_transition(0, 'a', 0);
        dfa.set_accepting(0, true);
        assert_eq!(show(derive(&dfa)), "a*");
    }

    #[test]
    fn test_derive_handles_back_edges() {
        // 0 -a-> 1 -b-> 0, 0 accepting: (ab)*
        let mut dfa = Dfa::new();
        let s = dfa.add_state();
        dfa.set_transition(0, 'a', s);
        dfa.set_transition(s, 'b', 0);
        dfa.set_accepting(0, true);
        let pattern = show(derive(&dfa));
        assert_eq!(pattern, "(?:ab)*");
    }

    #[test]
    fn test_derive_empty_language() {
        assert_eq!(derive(&Dfa::new()), None);
    }
}
