//! # Value/Use Representation for IR Nodes
//!
//! Nodes that produce results are referenced by the nodes that consume them
//! through operand edges. Every edge is threaded into the use list of the
//! value it targets, so all consumers of a value can be found, rewritten, or
//! detached in constant time per edge.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs           # This file - module definition and re-exports
//! ├── value.rs         # ValueId, Value (result handle), ValueKind, ResultTypes
//! ├── operand.rs       # OperandId, Operand (owned edge), UseSlot
//! ├── context.rs       # UseDefContext: value/edge arena, link/unlink, RAUW
//! ├── use_iter.rs      # Uses, ResultUses, UseCursor, ResultUseCursor
//! ├── operand_list.rs  # OperandList, FixedOperandList, TailAllocatedOperandList
//! └── value_array.rs   # OperandValueArray (edges projected to targets)
//! ```
//!
//! ## Key Types
//!
//! - [`Value`] - Copyable `(identity, result number)` handle, the thing being used
//! - [`Operand`] - Owned edge from a consumer to a [`Value`]
//! - [`UseDefContext`] - Arena that owns identities and edges and sequences teardown
//! - [`FixedOperandList`] / [`TailAllocatedOperandList`] - Per-node edge storage
//!
//! ## Threading
//!
//! Single mutator. Nothing here is synchronized; a context may move between
//! threads but must not be shared by concurrent passes.

pub(crate) mod context;
pub(crate) mod operand;
mod operand_list;
mod use_iter;
mod value;
mod value_array;

// Re-export all public types
pub use context::{ContextStats, UseDefContext};
pub use operand::{Operand, OperandId, UseSlot};
pub use operand_list::{FixedOperandList, OperandList, TailAllocatedOperandList};
pub use use_iter::{ResultUseCursor, ResultUses, UseCursor, Uses};
pub use value::{
    ResultTypes, TypeRef, Value, ValueId, ValueKind, MAX_RESULTS, MAX_VALUE_INDEX,
    RESULT_NUMBER_BITS,
};
pub use value_array::OperandValueArray;
