//! Hopcroft's DFA minimization.
//!
//! Starting from the partition `{F, Q \ F}`, blocks are split until no block
//! can be distinguished by any splitter. Only the predecessors of a splitter
//! are examined (through an inverse transition index), and after a split only
//! the smaller half is queued unless the split block was already waiting.

use {
    crate::{
        dfa::{Dfa, StateId},
        error::Result,
        partition::{BlockId, Partition, Worklist},
    },
    bit_set::BitSet,
    indexmap::IndexMap,
    log::{debug, trace},
    std::collections::VecDeque,
    vec_map::VecMap,
};

/// Returns the minimal automaton accepting the same language as `dfa`.
///
/// Only states reachable from the start state take part. The block holding
/// the start state becomes state `0` of the result.
pub fn minimize(dfa: &Dfa) -> Result<Dfa> {
    let n = dfa.num_states();
    let states = dfa.visit();
    debug!("Minimizing {} reachable states", states.len());

    // inverse[target][c] = states with a transition on `c` into `target`
    let mut inverse: Vec<IndexMap<char, BitSet>> = vec![IndexMap::new(); n];
    for &s in &states {
        for (&c, &target) in &dfa.state(s).by_char {
            inverse[target]
                .entry(c)
                .or_insert_with(|| BitSet::with_capacity(n))
                .insert(s);
        }
    }

    let mut partition = Partition::new(n);
    let mut worklist = Worklist::new();
    let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
        states.iter().copied().partition(|&s| dfa.state(s).accepting);
    for block in [accepting, rejecting] {
        if !block.is_empty() {
            worklist.push(partition.insert(block.into_iter().collect()));
        }
    }

    while let Some(splitter) = worklist.pop() {
        let splitter = partition.get(splitter)?.clone();

        let mut predecessors: IndexMap<char, BitSet> = IndexMap::new();
        for s in splitter.iter() {
            for (&c, preds) in &inverse[s] {
                predecessors
                    .entry(c)
                    .or_insert_with(|| BitSet::with_capacity(n))
                    .union_with(preds);
            }
        }

        for x in predecessors.values() {
            for y in partition.touched_by(x) {
                let block = partition.get(y)?;
                let mut inside = block.clone();
                inside.intersect_with(x);
                let mut outside = block.clone();
                outside.difference_with(x);
                if inside.is_empty() || outside.is_empty() {
                    continue;
                }

                let smaller_is_inside = inside.len() <= outside.len();
                let moved = partition.split(y, inside, outside)?;
                trace!("Split block {y}, new block {moved}");
                if worklist.contains(y) {
                    worklist.push(moved);
                } else if smaller_is_inside {
                    worklist.push(y);
                } else {
                    worklist.push(moved);
                }
            }
        }
    }
    debug!("Refined into {} blocks", partition.len());

    build(dfa, &partition)
}

/// Builds one state per block, discovering blocks from the start state.
fn build(dfa: &Dfa, partition: &Partition) -> Result<Dfa> {
    let mut result = Dfa::new();
    let mut new_state: VecMap<StateId> = VecMap::new();
    let mut queue: VecDeque<BlockId> = VecDeque::new();

    if let Some(start) = partition.block_of(dfa.start()) {
        new_state.insert(start, result.start());
        queue.push_back(start);
    }

    while let Some(block) = queue.pop_front() {
        let Some(representative) = partition.get(block)?.iter().next() else {
            continue;
        };
        let from = new_state[block];
        let source = dfa.state(representative);
        result.set_accepting(from, source.accepting);
        for (&c, &target) in &source.by_char {
            let Some(target_block) = partition.block_of(target) else {
                continue;
            };
            let to = match new_state.get(target_block) {
                Some(&to) => to,
                None => {
                    let to = result.add_state();
                    new_state.insert(target_block, to);
                    queue.push_back(target_block);
                    to
                }
            };
            result.set_transition(from, c, to);
        }
    }

    Ok(result)
}
