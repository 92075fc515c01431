//! Block bookkeeping for partition refinement.
//!
//! Blocks live in an arena keyed by a stable [`BlockId`], so the worklist can
//! refer to a block by identifier even after the block has been split.

use {
    crate::{
        dfa::StateId,
        error::{Error, Result},
    },
    bit_set::BitSet,
    std::collections::VecDeque,
    vec_map::VecMap,
};

pub type BlockId = usize;

/// A partition of automaton states into disjoint blocks.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    blocks: VecMap<BitSet>,
    block_of: Vec<Option<BlockId>>,
    next_id: BlockId,
}

impl Partition {
    pub fn new(num_states: usize) -> Partition {
        Partition {
            blocks: VecMap::new(),
            block_of: vec![None; num_states],
            next_id: 0,
        }
    }

    /// Adds a block and returns its identifier.
    pub fn insert(&mut self, block: BitSet) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        for s in block.iter() {
            self.block_of[s] = Some(id);
        }
        self.blocks.insert(id, block);
        id
    }

    pub fn get(&self, id: BlockId) -> Result<&BitSet> {
        self.blocks.get(id).ok_or(Error::MissingBlock(id))
    }

    /// The block currently holding `state`, if the state was ever partitioned.
    pub fn block_of(&self, state: StateId) -> Option<BlockId> {
        self.block_of.get(state).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Replaces block `id` by `kept` and `moved`. `kept` stays under `id`;
    /// `moved` gets a new identifier, which is returned.
    pub fn split(&mut self, id: BlockId, kept: BitSet, moved: BitSet) -> Result<BlockId> {
        if self.blocks.remove(id).is_none() {
            return Err(Error::MissingBlock(id));
        }
        self.blocks.insert(id, kept);
        Ok(self.insert(moved))
    }

    /// Identifiers of the blocks that share at least one state with `states`,
    /// in ascending order.
    pub fn touched_by(&self, states: &BitSet) -> Vec<BlockId> {
        let mut touched = BitSet::with_capacity(self.next_id);
        for s in states.iter() {
            if let Some(id) = self.block_of(s) {
                touched.insert(id);
            }
        }
        touched.iter().collect()
    }
}

/// Blocks still waiting to be used as splitters, in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    queue: VecDeque<BlockId>,
    queued: BitSet,
}

impl Worklist {
    pub fn new() -> Worklist {
        Worklist::default()
    }

    pub fn push(&mut self, id: BlockId) {
        if self.queued.insert(id) {
            self.queue.push_back(id);
        }
    }

    pub fn pop(&mut self) -> Option<BlockId> {
        let id = self.queue.pop_front()?;
        self.queued.remove(id);
        Some(id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.queued.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
