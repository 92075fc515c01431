use bit_set::BitSet;
use indexmap::IndexMap;

pub type StateId = usize;

/// One automaton state. Transitions keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub by_char: IndexMap<char, StateId>,
    pub accepting: bool,
}

/// A deterministic automaton stored as an arena of states.
///
/// States are addressed by index; state `0` is always the start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub states: Vec<State>,
}

impl Default for Dfa {
    fn default() -> Dfa {
        Dfa::new()
    }
}

impl Dfa {
    /// Creates an automaton with a single, non-accepting start state.
    pub fn new() -> Dfa {
        Dfa { states: vec![State::default()] }
    }

    pub fn start(&self) -> StateId {
        0
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn set_accepting(&mut self, id: StateId, accepting: bool) {
        self.states[id].accepting = accepting;
    }

    pub fn transition(&self, from: StateId, c: char) -> Option<StateId> {
        self.states[from].by_char.get(&c).copied()
    }

    pub fn set_transition(&mut self, from: StateId, c: char, to: StateId) {
        self.states[from].by_char.insert(c, to);
    }

    /// Follows the transition on `c`, creating a fresh state if there is none yet.
    pub fn get_or_insert_transition(&mut self, from: StateId, c: char) -> StateId {
        if let Some(to) = self.transition(from, c) {
            return to;
        }
        let to = self.add_state();
        self.set_transition(from, c, to);
        to
    }

    /// Returns every state reachable from the start state, in depth-first
    /// preorder. Successors are explored in transition insertion order and each
    /// state is listed once, however many predecessors share it.
    pub fn visit(&self) -> Vec<StateId> {
        let mut visited = BitSet::with_capacity(self.states.len());
        let mut order = Vec::new();
        let mut stack = vec![self.start()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.states[id].by_char.values().rev().copied());
        }
        order
    }

    /// Tests whether the automaton accepts `s`.
    pub fn accepts(&self, s: &str) -> bool {
        let mut cur = self.start();
        for c in s.chars() {
            match self.transition(cur, c) {
                Some(next) => cur = next,
                None => return false,
            }
        }
        self.states[cur].accepting
    }

    /// Tests whether no cycle is reachable from the start state.
    pub fn is_acyclic(&self) -> bool {
        let n = self.states.len();
        let mut done = BitSet::with_capacity(n);
        let mut on_path = BitSet::with_capacity(n);
        // (state, index of the next successor to explore)
        let mut stack = vec![(self.start(), 0)];
        on_path.insert(self.start());
        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            match self.states[id].by_char.get_index(next) {
                Some((_, &succ)) => {
                    top.1 += 1;
                    if on_path.contains(succ) {
                        return false;
                    }
                    if !done.contains(succ) {
                        on_path.insert(succ);
                        stack.push((succ, 0));
                    }
                }
                None => {
                    on_path.remove(id);
                    done.insert(id);
                    stack.pop();
                }
            }
        }
        true
    }
}
