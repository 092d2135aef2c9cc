//! Functions and their basic blocks.
//!
//! A function owns its blocks in an arena; block edges are indices in both
//! directions, so connecting and disconnecting blocks never creates an
//! ownership cycle. Instructions are the textual form the downstream
//! emitter consumes.

use std::fmt;

use mead_util::{define_idx, IndexVec};

use crate::scope::ScopeId;
use crate::types::Type;

define_idx!(
    /// Index of a basic block within its owning [`Function`].
    BlockId
);

/// One emitted instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction(pub String);

impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A maximal straight-line instruction sequence.
#[derive(Clone, Debug, Default)]
pub struct BasicBlock {
    /// Predecessor blocks
    pub ins: Vec<BlockId>,
    /// Successor blocks
    pub outs: Vec<BlockId>,
    pub instructions: Vec<Instruction>,
}

/// A compiled function.
#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub argument_types: Vec<Type>,
    pub blocks: IndexVec<BlockId, BasicBlock>,
    pub entry_block: BlockId,
    pub exit_block: BlockId,
    /// The function's own scope, a child of the global scope.
    pub scope: ScopeId,
}

impl Function {
    /// Create a function with fresh entry and exit blocks.
    pub fn new(
        name: impl Into<String>,
        return_type: Type,
        argument_types: Vec<Type>,
        scope: ScopeId,
    ) -> Self {
        let mut blocks = IndexVec::new();
        let entry_block = blocks.push(BasicBlock::default());
        let exit_block = blocks.push(BasicBlock::default());
        Self {
            name: name.into(),
            return_type,
            argument_types,
            blocks,
            entry_block,
            exit_block,
            scope,
        }
    }

    pub fn add_block(&mut self) -> BlockId {
        self.blocks.push(BasicBlock::default())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Connect `from` to `to`: `to` joins `from`'s out set and `from` joins
    /// `to`'s in set.
    pub fn connect(&mut self, from: BlockId, to: BlockId) {
        if !self.blocks[from].outs.contains(&to) {
            self.blocks[from].outs.push(to);
        }
        if !self.blocks[to].ins.contains(&from) {
            self.blocks[to].ins.push(from);
        }
    }

    /// Remove the edges between two blocks in both directions.
    pub fn disconnect(&mut self, a: BlockId, b: BlockId) {
        self.blocks[a].outs.retain(|&id| id != b);
        self.blocks[a].ins.retain(|&id| id != b);
        self.blocks[b].outs.retain(|&id| id != a);
        self.blocks[b].ins.retain(|&id| id != a);
    }

    pub fn push_instruction(&mut self, block: BlockId, instruction: Instruction) {
        self.blocks[block].instructions.push(instruction);
    }
}
