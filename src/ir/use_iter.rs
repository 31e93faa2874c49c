//! Use-list traversal
//!
//! Two flavors, each as a borrowing [`Iterator`] and as a detached cursor:
//!
//! - [`Uses`] / [`UseCursor`]: every edge using any result of a value
//! - [`ResultUses`] / [`ResultUseCursor`]: only edges naming one result
//!
//! Both results of a value share one use list, so the filtered flavor costs
//! time proportional to all uses of the value, not just the matching ones.
//!
//! Iterators hold a shared borrow of the context and therefore cannot
//! observe mutation. Cursors hold no borrow: [`UseCursor::next`] returns the
//! current edge after stepping past it, so a pass may retarget or release
//! the returned edge before asking for the next one.

use super::context::UseDefContext;
use super::operand::OperandId;
use std::iter::FusedIterator;

/// All uses of a value, most recently linked first
#[derive(Clone)]
pub struct Uses<'a> {
    ctx: &'a UseDefContext,
    cur: Option<OperandId>,
}

impl<'a> Uses<'a> {
    pub(crate) fn new(ctx: &'a UseDefContext, first: Option<OperandId>) -> Self {
        Self { ctx, cur: first }
    }

    /// Edge the iterator will yield next; `None` at the end
    pub fn peek(&self) -> Option<OperandId> {
        self.cur
    }
}

impl Iterator for Uses<'_> {
    type Item = OperandId;

    fn next(&mut self) -> Option<OperandId> {
        let cur = self.cur?;
        self.cur = self.ctx.next_use(cur);
        Some(cur)
    }
}

impl FusedIterator for Uses<'_> {}

impl PartialEq for Uses<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl Eq for Uses<'_> {}

impl std::fmt::Debug for Uses<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uses").field("cur", &self.cur).finish()
    }
}

/// Uses of one result of a value, most recently linked first
#[derive(Clone)]
pub struct ResultUses<'a> {
    ctx: &'a UseDefContext,
    cur: Option<OperandId>,
    result_number: u32,
}

impl<'a> ResultUses<'a> {
    pub(crate) fn new(ctx: &'a UseDefContext, first: Option<OperandId>, result_number: u32) -> Self {
        Self {
            ctx,
            cur: skip_to_result(ctx, first, result_number),
            result_number,
        }
    }

    /// Result number this iterator filters on
    pub fn result_number(&self) -> u32 {
        self.result_number
    }

    /// Edge the iterator will yield next; `None` at the end
    pub fn peek(&self) -> Option<OperandId> {
        self.cur
    }
}

impl Iterator for ResultUses<'_> {
    type Item = OperandId;

    fn next(&mut self) -> Option<OperandId> {
        let cur = self.cur?;
        self.cur = skip_to_result(self.ctx, self.ctx.next_use(cur), self.result_number);
        Some(cur)
    }
}

impl FusedIterator for ResultUses<'_> {}

/// Compares positions only; the result number filter is ignored.
impl PartialEq for ResultUses<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl Eq for ResultUses<'_> {}

impl std::fmt::Debug for ResultUses<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultUses")
            .field("cur", &self.cur)
            .field("result_number", &self.result_number)
            .finish()
    }
}

/// Detached position in a value's use list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCursor {
    cur: Option<OperandId>,
}

impl UseCursor {
    pub(crate) fn new(first: Option<OperandId>) -> Self {
        Self { cur: first }
    }

    /// Edge under the cursor; `None` at the end
    pub fn get(&self) -> Option<OperandId> {
        self.cur
    }

    /// True once the cursor has run off the list
    pub fn is_end(&self) -> bool {
        self.cur.is_none()
    }

    /// Step to the following edge.
    ///
    /// # Panics
    ///
    /// At the end of the list.
    pub fn advance(&mut self, ctx: &UseDefContext) {
        let cur = self.cur.expect("advancing a use cursor past the end");
        self.cur = ctx.next_use(cur);
    }

    /// Return the edge under the cursor and step past it
    pub fn next(&mut self, ctx: &UseDefContext) -> Option<OperandId> {
        let cur = self.cur?;
        self.cur = ctx.next_use(cur);
        Some(cur)
    }
}

/// Detached position in a value's use list, restricted to one result
#[derive(Debug, Clone, Copy)]
pub struct ResultUseCursor {
    cur: Option<OperandId>,
    result_number: u32,
}

impl ResultUseCursor {
    pub(crate) fn new(ctx: &UseDefContext, first: Option<OperandId>, result_number: u32) -> Self {
        Self {
            cur: skip_to_result(ctx, first, result_number),
            result_number,
        }
    }

    /// Edge under the cursor; `None` at the end
    pub fn get(&self) -> Option<OperandId> {
        self.cur
    }

    /// Result number this cursor filters on
    pub fn result_number(&self) -> u32 {
        self.result_number
    }

    /// True once the cursor has run off the list
    pub fn is_end(&self) -> bool {
        self.cur.is_none()
    }

    /// Step to the following matching edge.
    ///
    /// # Panics
    ///
    /// At the end of the list.
    pub fn advance(&mut self, ctx: &UseDefContext) {
        let cur = self.cur.expect("advancing a use cursor past the end");
        self.cur = skip_to_result(ctx, ctx.next_use(cur), self.result_number);
    }

    /// Return the edge under the cursor and step past it
    pub fn next(&mut self, ctx: &UseDefContext) -> Option<OperandId> {
        let cur = self.cur?;
        self.cur = skip_to_result(ctx, ctx.next_use(cur), self.result_number);
        Some(cur)
    }
}

/// Positions only, like [`ResultUses`]
impl PartialEq for ResultUseCursor {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl Eq for ResultUseCursor {}

fn skip_to_result(
    ctx: &UseDefContext,
    mut cur: Option<OperandId>,
    result_number: u32,
) -> Option<OperandId> {
    while let Some(op) = cur {
        if ctx.get(op).result_number() == result_number {
            break;
        }
        cur = ctx.next_use(op);
    }
    cur
}
