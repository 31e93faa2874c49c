//! Operand list containers
//!
//! A consuming node owns its edges through one of two containers:
//!
//! - [`FixedOperandList<N>`]: exactly `N` edges, arity checked by the type
//! - [`TailAllocatedOperandList<N>`]: `N` static edges followed by a run of
//!   dynamic edges whose count is fixed at construction
//!
//! Both store their edges contiguously and share the [`OperandList`]
//! interface, so code that only reads or rewrites operands does not care
//! which shape a node uses.

use super::context::UseDefContext;
use super::operand::Operand;
use super::value::{Value, ValueId};
use super::value_array::OperandValueArray;
use std::mem;
use std::ops::{Index, IndexMut};

/// Common view over a node's operand edges
pub trait OperandList {
    /// All edges in operand order
    fn as_slice(&self) -> &[Operand];

    /// All edges, for reordering within the owning node
    fn as_mut_slice(&mut self) -> &mut [Operand];

    /// Number of edges
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True when the node has no operands
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Edge `i`, `None` past the end
    fn operand(&self, i: usize) -> Option<&Operand> {
        self.as_slice().get(i)
    }

    /// Current targets of all edges
    fn values<'a>(&'a self, ctx: &'a UseDefContext) -> OperandValueArray<'a> {
        OperandValueArray::new(ctx, self.as_slice())
    }

    /// Retarget every edge to [`Value::INVALID`], unlinking it from its use
    /// list while keeping the edge itself alive
    fn drop_all_references(&self, ctx: &mut UseDefContext) {
        for op in self.as_slice() {
            ctx.set(op.id(), Value::INVALID);
        }
    }
}

/// A constant-size operand list
#[derive(Debug)]
pub struct FixedOperandList<const N: usize> {
    operands: [Operand; N],
}

impl<const N: usize> FixedOperandList<N> {
    /// Create `N` edges owned by `user`, one per target
    pub fn new(ctx: &mut UseDefContext, user: ValueId, values: [Value; N]) -> Self {
        Self {
            operands: values.map(|value| ctx.create_operand(user, value)),
        }
    }

    /// Release every edge in operand order
    pub fn release(self, ctx: &mut UseDefContext) {
        for op in self.operands {
            ctx.release_operand(op);
        }
    }
}

impl<const N: usize> OperandList for FixedOperandList<N> {
    fn as_slice(&self) -> &[Operand] {
        &self.operands
    }

    fn as_mut_slice(&mut self) -> &mut [Operand] {
        &mut self.operands
    }
}

impl<const N: usize> Index<usize> for FixedOperandList<N> {
    type Output = Operand;

    fn index(&self, i: usize) -> &Operand {
        &self.operands[i]
    }
}

impl<const N: usize> IndexMut<usize> for FixedOperandList<N> {
    fn index_mut(&mut self, i: usize) -> &mut Operand {
        &mut self.operands[i]
    }
}

/// An operand list with `N` known operands (possibly zero) followed by a
/// dynamically determined number of extra operands (also possibly zero).
///
/// The extra count is set at construction and never changes. Static and
/// dynamic edges share one boxed slice kept apart from the owning node, so
/// the node itself stays fixed-size.
#[derive(Debug)]
pub struct TailAllocatedOperandList<const N: usize> {
    operands: Box<[Operand]>,
}

impl<const N: usize> TailAllocatedOperandList<N> {
    /// Bytes of edge storage the dynamic tail adds for `num_extra` operands.
    ///
    /// A sizing query for allocators that budget node memory up front.
    pub fn extra_size(num_extra: usize) -> usize {
        mem::size_of::<Operand>() * num_extra
    }

    /// Create the edges for `user`.
    ///
    /// Logically the dynamic operands come after the fixed ones; the
    /// argument order only mirrors how variadic operands are usually
    /// collected before the fixed ones.
    pub fn new(
        ctx: &mut UseDefContext,
        user: ValueId,
        dynamic: &[Value],
        fixed: [Value; N],
    ) -> Self {
        let mut operands = Vec::with_capacity(N + dynamic.len());
        operands.extend(fixed.map(|value| ctx.create_operand(user, value)));
        for &value in dynamic {
            operands.push(ctx.create_operand(user, value));
        }
        tracing::trace!("{}: {} static + {} dynamic operand(s)", user, N, dynamic.len());
        Self {
            operands: operands.into_boxed_slice(),
        }
    }

    /// Number of dynamic operands
    pub fn num_extra(&self) -> usize {
        self.operands.len() - N
    }

    /// The dynamic edges
    pub fn dynamic(&self) -> &[Operand] {
        &self.operands[N..]
    }

    /// The dynamic edges, mutably
    pub fn dynamic_mut(&mut self) -> &mut [Operand] {
        &mut self.operands[N..]
    }

    /// Current targets of the dynamic edges
    pub fn dynamic_values<'a>(&'a self, ctx: &'a UseDefContext) -> OperandValueArray<'a> {
        OperandValueArray::new(ctx, self.dynamic())
    }

    /// Release the dynamic edges in forward order and hand the static edges
    /// back to the owning node, which tears them down with its own fields.
    pub fn release(self, ctx: &mut UseDefContext) -> FixedOperandList<N> {
        let mut operands = self.operands.into_vec();
        for op in operands.drain(N..) {
            ctx.release_operand(op);
        }
        let operands: [Operand; N] = match operands.try_into() {
            Ok(operands) => operands,
            Err(_) => unreachable!("static operand count is fixed at construction"),
        };
        FixedOperandList { operands }
    }

    /// Release every edge, static ones included
    pub fn release_all(self, ctx: &mut UseDefContext) {
        self.release(ctx).release(ctx);
    }
}

impl TailAllocatedOperandList<0> {
    /// Variadic node with no static operands
    pub fn new_variadic(ctx: &mut UseDefContext, user: ValueId, dynamic: &[Value]) -> Self {
        Self::new(ctx, user, dynamic, [])
    }
}

impl<const N: usize> OperandList for TailAllocatedOperandList<N> {
    fn as_slice(&self) -> &[Operand] {
        &self.operands
    }

    fn as_mut_slice(&mut self) -> &mut [Operand] {
        &mut self.operands
    }
}

impl<const N: usize> Index<usize> for TailAllocatedOperandList<N> {
    type Output = Operand;

    fn index(&self, i: usize) -> &Operand {
        &self.operands[i]
    }
}

impl<const N: usize> IndexMut<usize> for TailAllocatedOperandList<N> {
    fn index_mut(&mut self, i: usize) -> &mut Operand {
        &mut self.operands[i]
    }
}
