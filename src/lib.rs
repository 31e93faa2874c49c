//! # usechain - Use-Def Chains for Compiler IR
//!
//! The value/use core of an SSA-style intermediate representation: how nodes
//! that produce results are referenced by the nodes that consume them, and how
//! every such reference can be found, rewritten, or removed in constant time
//! while passes mutate the IR in place.
//!
//! ## Quick Start
//!
//! ```rust
//! use usechain::{FixedOperandList, OperandList, TypeRef, UseDefContext, Value, ValueKind};
//!
//! # fn main() -> usechain::Result<()> {
//! let mut ctx = UseDefContext::new();
//! let i64_ty = TypeRef::new(0);
//!
//! // %0 = integer_literal, %1 = integer_literal
//! let lhs = ctx.create_value(ValueKind::IntegerLiteral, i64_ty);
//! let rhs = ctx.create_value(ValueKind::IntegerLiteral, i64_ty);
//!
//! // %2 = tuple (%0, %1)
//! let tuple = ctx.create_value(ValueKind::Tuple, TypeRef::new(1));
//! let operands = FixedOperandList::new(&mut ctx, tuple, [lhs.into(), rhs.into()]);
//! assert_eq!(ctx.users(lhs).collect::<Vec<_>>(), vec![tuple]);
//!
//! // Rewrite every use of %0 to %1
//! let moved = ctx.replace_all_uses_with(Value::from(lhs), Value::from(rhs))?;
//! assert_eq!(moved, 1);
//! assert!(ctx.uses_empty(lhs));
//! assert_eq!(ctx.use_count(rhs), 2);
//! assert_eq!(operands.values(&ctx).to_vec(), vec![Value::from(rhs); 2]);
//!
//! // Consumers go first, then producers
//! operands.release(&mut ctx);
//! ctx.erase_value(tuple)?;
//! ctx.erase_value(lhs)?;
//! ctx.erase_value(rhs)?;
//! ctx.verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! UseDefContext
//!   ├── value table:  ValueId  → { kind, result types, first_use }
//!   └── edge table:   OperandId → { target Value, next_use, back slot, owner }
//! ```
//!
//! ### Main Components
//!
//! - [`Value`] - `(identity, result number)` handle; ordered and hashable
//! - [`Operand`] - Owned use edge; [`OperandId`] is its copyable name
//! - [`Uses`] / [`ResultUses`] - Use-list iterators (all results / one result)
//! - [`UseCursor`] / [`ResultUseCursor`] - Detached cursors for rewriting passes
//! - [`FixedOperandList`] / [`TailAllocatedOperandList`] - Per-node edge storage
//! - [`OperandValueArray`] - Edges projected to the values they use
//! - [`Verifier`] - Use-list integrity checks
//!
//! ## Contract Violations
//!
//! Out-of-range result numbers, stepping a cursor past the end, and touching
//! erased values or released edges panic. Arena-level requests that can be
//! refused (erasing a used value, bulk rewrites) return [`Result`].

pub mod config;
pub mod error;
pub mod ir;
pub mod verifier;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types
pub use config::ContextOptions;
pub use error::{Error, ErrorSeverity, Result};
pub use ir::{
    ContextStats, FixedOperandList, Operand, OperandId, OperandList, OperandValueArray,
    ResultTypes, ResultUseCursor, ResultUses, TailAllocatedOperandList, TypeRef, UseCursor,
    UseDefContext, UseSlot, Uses, Value, ValueId, ValueKind, MAX_RESULTS, RESULT_NUMBER_BITS,
};
pub use verifier::{UseGraphStats, VerifyError, VerifyResult, Verifier};
