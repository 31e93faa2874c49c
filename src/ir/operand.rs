//! Operand edges
//!
//! An operand is the edge from a consuming node to the [`Value`] it uses.
//! Its link data lives in the [`UseDefContext`] edge table; the consumer owns
//! the edge through an [`Operand`] token.

use super::context::UseDefContext;
use super::value::{Value, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an edge in the context's edge table.
///
/// Copyable and non-owning; this is what use iterators yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperandId(pub(crate) u32);

impl OperandId {
    /// Raw index into the edge table
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OperandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// The slot holding the forward link that points at an edge.
///
/// Either the head of a value's use list or another edge's `next_use`.
/// Storing the slot instead of the previous edge is what makes unlinking O(1)
/// without distinguishing the head case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseSlot {
    /// `first_use` of the value
    Head(ValueId),
    /// `next_use` of the edge
    Next(OperandId),
}

impl fmt::Display for UseSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseSlot::Head(value) => write!(f, "{}.first_use", value),
            UseSlot::Next(op) => write!(f, "{}.next_use", op),
        }
    }
}

/// Link data of a live edge
#[derive(Debug, Clone)]
pub(crate) struct OperandData {
    /// Current target
    pub value: Value,
    /// Next edge in the target's use list
    pub next_use: Option<OperandId>,
    /// Slot pointing at this edge; `None` iff unlinked
    pub back: Option<UseSlot>,
    /// Consuming node, fixed for the edge's lifetime
    pub owner: ValueId,
}

/// Edge-table entry
#[derive(Debug, Clone)]
pub(crate) enum OperandSlot {
    Occupied(OperandData),
    Vacant { next_free: Option<OperandId> },
}

/// An owned use edge.
///
/// Neither `Clone` nor `Copy`: exactly one consumer owns each edge. Give it
/// back with [`UseDefContext::release_operand`] (or release the owning
/// operand list) to unlink it.
///
/// Dropping a token any other way would leave its edge linked with nothing
/// able to remove it, so it is reported: a panic in debug builds, a
/// `tracing` warning otherwise. Drops during unwinding are not reported.
#[must_use = "an operand stays linked until it is released"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Operand {
    id: OperandId,
}

impl Operand {
    pub(crate) fn from_id(id: OperandId) -> Self {
        Self { id }
    }

    /// Non-owning reference to this edge
    pub fn id(&self) -> OperandId {
        self.id
    }

    /// Current target
    pub fn get(&self, ctx: &UseDefContext) -> Value {
        ctx.get(self.id)
    }

    /// Retarget this edge
    pub fn set(&self, ctx: &mut UseDefContext, value: Value) {
        ctx.set(self.id, value)
    }

    /// Consuming node that owns this edge
    pub fn user(&self, ctx: &UseDefContext) -> ValueId {
        ctx.user(self.id)
    }
}

impl Drop for Operand {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        tracing::warn!("{} dropped without being released", self.id);
        if cfg!(debug_assertions) {
            panic!(
                "operand {} dropped without being released; its use stays linked",
                self.id
            );
        }
    }
}
