//! Read-only projection of operand edges onto their current targets

use super::context::UseDefContext;
use super::operand::Operand;
use super::value::Value;
use std::ops::Index;

/// A slice of edges viewed as the [`Value`]s they use.
///
/// Behaves like `&[Value]` without exposing edge mutation.
#[derive(Clone, Copy)]
pub struct OperandValueArray<'a> {
    ctx: &'a UseDefContext,
    operands: &'a [Operand],
}

impl<'a> OperandValueArray<'a> {
    /// Project `operands` through `ctx`
    pub fn new(ctx: &'a UseDefContext, operands: &'a [Operand]) -> Self {
        Self { ctx, operands }
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// True when there are no edges
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Target of edge `i`, `None` past the end
    pub fn get(&self, i: usize) -> Option<Value> {
        self.operands.get(i).map(|op| self.ctx.get(op.id()))
    }

    /// Target of the first edge
    pub fn front(&self) -> Option<Value> {
        self.operands.first().map(|op| self.ctx.get(op.id()))
    }

    /// Target of the last edge
    pub fn back(&self) -> Option<Value> {
        self.operands.last().map(|op| self.ctx.get(op.id()))
    }

    /// Sub-view of `len` edges starting at `begin`.
    ///
    /// # Panics
    ///
    /// If the range is out of bounds.
    pub fn slice(&self, begin: usize, len: usize) -> OperandValueArray<'a> {
        OperandValueArray {
            ctx: self.ctx,
            operands: &self.operands[begin..begin + len],
        }
    }

    /// Iterate the targets in operand order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Value> + 'a {
        let ctx = self.ctx;
        self.operands.iter().map(move |op| ctx.get(op.id()))
    }

    /// Collect the targets
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().collect()
    }
}

impl Index<usize> for OperandValueArray<'_> {
    type Output = Value;

    fn index(&self, i: usize) -> &Value {
        &self.ctx.operand_data(self.operands[i].id()).value
    }
}

impl<'a> IntoIterator for OperandValueArray<'a> {
    type Item = Value;
    type IntoIter = Box<dyn ExactSizeIterator<Item = Value> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl PartialEq<[Value]> for OperandValueArray<'_> {
    fn eq(&self, other: &[Value]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == *b)
    }
}

impl std::fmt::Debug for OperandValueArray<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
