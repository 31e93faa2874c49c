//! # Use-Def Context
//!
//! Central arena holding every value identity and every operand edge.
//!
//! Use lists are intrusive singly-forward-linked lists threaded through the
//! edge table. Each edge records the [`UseSlot`] that points at it, so an
//! edge can unlink itself in O(1):
//!
//! ```text
//! v0.first_use ──► op4 ──► op1 ──► op0 ──► ∅
//!                   ▲back   ▲back   ▲back
//!          Head(v0) ┘  Next(op4) Next(op1)
//! ```
//!
//! New edges are always linked at the head, so a use list enumerates
//! most-recently-linked first.
//!
//! The context is also the teardown authority: a value can only be erased
//! once every edge using it has been released or retargeted.

use super::operand::{Operand, OperandData, OperandId, OperandSlot, UseSlot};
use super::use_iter::{ResultUseCursor, ResultUses, UseCursor, Uses};
use super::value::{ResultTypes, TypeRef, Value, ValueId, ValueKind, MAX_RESULTS, MAX_VALUE_INDEX};
use crate::config::ContextOptions;
use crate::verifier::Verifier;
use crate::{Error, Result};
use std::mem;

/// Value-table entry
#[derive(Debug, Clone)]
pub(crate) struct ValueData {
    pub kind: ValueKind,
    pub types: ResultTypes,
    pub first_use: Option<OperandId>,
    pub erased: bool,
}

/// Arena counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextStats {
    /// Values ever created
    pub values_created: usize,
    /// Values erased
    pub values_erased: usize,
    /// Edges ever created
    pub operands_created: usize,
    /// Edges released
    pub operands_released: usize,
}

impl ContextStats {
    /// Values not yet erased
    pub fn live_values(&self) -> usize {
        self.values_created - self.values_erased
    }

    /// Edges not yet released
    pub fn live_operands(&self) -> usize {
        self.operands_created - self.operands_released
    }
}

/// Owner of all value identities and operand edges
#[derive(Debug)]
pub struct UseDefContext {
    values: Vec<ValueData>,
    operands: Vec<OperandSlot>,
    free_operand: Option<OperandId>,
    options: ContextOptions,
    stats: ContextStats,
}

impl Default for UseDefContext {
    fn default() -> Self {
        Self::new()
    }
}

impl UseDefContext {
    /// Create an empty context with default options
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    /// Create an empty context
    pub fn with_options(options: ContextOptions) -> Self {
        Self {
            values: Vec::with_capacity(options.value_capacity),
            operands: Vec::with_capacity(options.operand_capacity),
            free_operand: None,
            options,
            stats: ContextStats::default(),
        }
    }

    /// Options this context was built with
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Arena counters
    pub fn stats(&self) -> ContextStats {
        self.stats
    }

    // =========================================================================
    // Value identities
    // =========================================================================

    /// Create a value identity.
    ///
    /// # Panics
    ///
    /// If more than [`MAX_RESULTS`] result types are declared.
    pub fn create_value(&mut self, kind: ValueKind, types: impl Into<ResultTypes>) -> ValueId {
        let types = types.into();
        assert!(
            types.len() <= MAX_RESULTS as usize,
            "{} declares {} results, at most {} are addressable",
            kind,
            types.len(),
            MAX_RESULTS
        );
        let index = self.values.len() as u32;
        assert!(index <= MAX_VALUE_INDEX, "value table exhausted");

        self.values.push(ValueData {
            kind,
            types,
            first_use: None,
            erased: false,
        });
        self.stats.values_created += 1;
        ValueId(index)
    }

    /// Erase a value identity.
    ///
    /// Every edge using it must already be released or retargeted. The id is
    /// retired and never handed out again.
    pub fn erase_value(&mut self, id: ValueId) -> Result<()> {
        let data = self
            .values
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("{} is not a value of this context", id));
        if data.erased {
            return Err(Error::ValueErased { value: id });
        }
        if data.first_use.is_some() {
            return Err(Error::ValueHasUses {
                value: id,
                uses: self.use_count(id),
            });
        }

        let data = &mut self.values[id.0 as usize];
        data.erased = true;
        data.types = ResultTypes::none();
        self.stats.values_erased += 1;
        tracing::debug!("erased {} ({})", id, data.kind);
        Ok(())
    }

    /// True if `id` names a value of this context that has not been erased
    pub fn contains_value(&self, id: ValueId) -> bool {
        self.values
            .get(id.0 as usize)
            .map_or(false, |data| !data.erased)
    }

    /// Ids of all values that have not been erased, in creation order
    pub fn live_values(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, data)| !data.erased)
            .map(|(index, _)| ValueId(index as u32))
    }

    /// Kind tag
    pub fn kind(&self, id: ValueId) -> ValueKind {
        self.value_data(id).kind
    }

    /// All result types, one per result
    pub fn types(&self, id: ValueId) -> &[TypeRef] {
        self.value_data(id).types.as_slice()
    }

    /// Type of result `i`.
    ///
    /// # Panics
    ///
    /// If `i` is out of range for the value's result count.
    pub fn ty(&self, id: ValueId, i: u32) -> TypeRef {
        let types = self.types(id);
        match types.get(i as usize) {
            Some(ty) => *ty,
            None => panic!(
                "result {} out of range for {} with {} result(s)",
                i,
                id,
                types.len()
            ),
        }
    }

    /// Number of results
    pub fn result_count(&self, id: ValueId) -> usize {
        self.types(id).len()
    }

    /// True if no edge uses any result of `id`
    pub fn uses_empty(&self, id: ValueId) -> bool {
        self.value_data(id).first_use.is_none()
    }

    /// Every edge using any result of `id`, most recently linked first
    pub fn uses(&self, id: ValueId) -> Uses<'_> {
        Uses::new(self, self.value_data(id).first_use)
    }

    /// Detached cursor over [`uses`](Self::uses)
    pub fn use_cursor(&self, id: ValueId) -> UseCursor {
        UseCursor::new(self.value_data(id).first_use)
    }

    /// Number of edges using any result of `id` (walks the list)
    pub fn use_count(&self, id: ValueId) -> usize {
        self.uses(id).count()
    }

    /// True if exactly one edge uses `id`
    pub fn has_one_use(&self, id: ValueId) -> bool {
        let mut uses = self.uses(id);
        uses.next().is_some() && uses.next().is_none()
    }

    /// Consumers of `id`, one entry per edge (a consumer using `id` twice
    /// appears twice)
    pub fn users(&self, id: ValueId) -> impl Iterator<Item = ValueId> + '_ {
        self.uses(id).map(move |op| self.user(op))
    }

    // =========================================================================
    // Result handles
    // =========================================================================

    /// Type of the result named by `value`.
    ///
    /// # Panics
    ///
    /// On the invalid handle, or a result number past the value's results.
    pub fn value_type(&self, value: Value) -> TypeRef {
        let def = expect_def(value);
        self.ty(def, value.result_number())
    }

    /// Edges using exactly this result, most recently linked first
    pub fn result_uses(&self, value: Value) -> ResultUses<'_> {
        let def = expect_def(value);
        ResultUses::new(self, self.value_data(def).first_use, value.result_number())
    }

    /// Detached cursor over [`result_uses`](Self::result_uses)
    pub fn result_use_cursor(&self, value: Value) -> ResultUseCursor {
        let def = expect_def(value);
        ResultUseCursor::new(self, self.value_data(def).first_use, value.result_number())
    }

    /// True if no edge uses this particular result
    pub fn result_uses_empty(&self, value: Value) -> bool {
        self.result_uses(value).next().is_none()
    }

    /// The only edge using this result, if there is exactly one
    pub fn single_result_use(&self, value: Value) -> Option<OperandId> {
        let mut uses = self.result_uses(value);
        match (uses.next(), uses.next()) {
            (Some(op), None) => Some(op),
            _ => None,
        }
    }

    // =========================================================================
    // Operand edges
    // =========================================================================

    /// Create an edge owned by `owner` and link it into `value`'s use list.
    ///
    /// An edge created with [`Value::INVALID`] stays unlinked until it is
    /// given a target with [`set`](Self::set).
    pub fn create_operand(&mut self, owner: ValueId, value: Value) -> Operand {
        debug_assert!(
            self.contains_value(owner),
            "{} cannot own an operand: not a live value",
            owner
        );
        let data = OperandData {
            value,
            next_use: None,
            back: None,
            owner,
        };
        let id = match self.free_operand {
            Some(id) if self.options.recycle_operand_slots => {
                self.free_operand = match self.operands[id.0 as usize] {
                    OperandSlot::Vacant { next_free } => next_free,
                    OperandSlot::Occupied(_) => unreachable!("free list holds an occupied slot"),
                };
                self.operands[id.0 as usize] = OperandSlot::Occupied(data);
                id
            }
            _ => {
                let id = OperandId(self.operands.len() as u32);
                self.operands.push(OperandSlot::Occupied(data));
                id
            }
        };
        self.stats.operands_created += 1;
        self.insert_into_current(id);
        Operand::from_id(id)
    }

    /// Unlink an edge and retire its slot
    pub fn release_operand(&mut self, operand: Operand) {
        let id = operand.id();
        mem::forget(operand);
        self.remove_from_current(id);
        self.operands[id.0 as usize] = OperandSlot::Vacant {
            next_free: self.free_operand,
        };
        if self.options.recycle_operand_slots {
            self.free_operand = Some(id);
        }
        self.stats.operands_released += 1;
    }

    /// Current target of an edge
    pub fn get(&self, op: OperandId) -> Value {
        self.operand_data(op).value
    }

    /// Retarget an edge: unlink from the old target's list, link at the head
    /// of the new one.
    ///
    /// Setting the same target again moves the edge to the head of its list.
    pub fn set(&mut self, op: OperandId, value: Value) {
        tracing::trace!("{}: {} -> {}", op, self.get(op), value);
        self.remove_from_current(op);
        self.operand_data_mut(op).value = value;
        self.insert_into_current(op);
    }

    /// Consumer that owns an edge
    pub fn user(&self, op: OperandId) -> ValueId {
        self.operand_data(op).owner
    }

    /// True if the edge is currently threaded into a use list
    pub fn is_linked(&self, op: OperandId) -> bool {
        self.operand_data(op).back.is_some()
    }

    /// Next edge in the same use list
    pub(crate) fn next_use(&self, op: OperandId) -> Option<OperandId> {
        self.operand_data(op).next_use
    }

    // =========================================================================
    // Bulk rewrites
    // =========================================================================

    /// Retarget every edge using `from` to `to`. Returns how many edges moved.
    ///
    /// Only edges naming the same result as `from` are touched; other results
    /// of the same identity keep their uses. Fails without changing anything
    /// if `to` names a result its value does not produce.
    pub fn replace_all_uses_with(&mut self, from: Value, to: Value) -> Result<usize> {
        if !to.is_valid() {
            return Err(Error::InvalidValue(to));
        }
        let from_def = expect_def(from);
        let to_def = expect_def(to);
        self.check_live(from_def)?;
        self.check_live(to_def)?;
        if from == to {
            return Ok(0);
        }
        let available = self.result_count(to_def);
        if to.result_number() as usize >= available {
            return Err(Error::ResultCountMismatch {
                from: from_def,
                to: to_def,
                result: to.result_number(),
                available,
            });
        }

        let mut cursor = self.result_use_cursor(from);
        let mut replaced = 0;
        while let Some(op) = cursor.next(self) {
            self.set(op, to);
            replaced += 1;
        }
        tracing::debug!("replaced {} use(s) of {} with {}", replaced, from, to);
        Ok(replaced)
    }

    /// Retarget every edge using any result of `from` to the same result
    /// number of `to`. Returns how many edges moved.
    ///
    /// Fails without changing anything if some used result of `from` has no
    /// counterpart on `to`.
    pub fn replace_all_uses_of_def(&mut self, from: ValueId, to: ValueId) -> Result<usize> {
        self.check_live(from)?;
        self.check_live(to)?;
        if from == to {
            return Ok(0);
        }

        let available = self.result_count(to);
        if let Some(result) = self
            .uses(from)
            .map(|op| self.get(op).result_number())
            .find(|&n| n as usize >= available)
        {
            return Err(Error::ResultCountMismatch {
                from,
                to,
                result,
                available,
            });
        }

        let mut cursor = self.use_cursor(from);
        let mut replaced = 0;
        while let Some(op) = cursor.next(self) {
            let result = self.get(op).result_number();
            self.set(op, Value::new(to, result));
            replaced += 1;
        }
        tracing::debug!("replaced {} use(s) of {} with {}", replaced, from, to);
        Ok(replaced)
    }

    /// Check use-list integrity, failing on the first problem found
    pub fn verify(&self) -> Result<()> {
        let result = Verifier::new().verify(self);
        match result.errors.first() {
            Some(err) => Err(Error::VerificationFailed(err.to_string())),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Linkage
    // =========================================================================

    fn remove_from_current(&mut self, op: OperandId) {
        let (back, next) = {
            let data = self.operand_data(op);
            (data.back, data.next_use)
        };
        let Some(back) = back else {
            return;
        };
        self.write_slot(back, next);
        if let Some(next) = next {
            self.operand_data_mut(next).back = Some(back);
        }

        let data = self.operand_data_mut(op);
        data.back = None;
        data.next_use = None;
        tracing::trace!("unlinked {} from {}", op, back);
    }

    fn insert_into_current(&mut self, op: OperandId) {
        let value = self.get(op);
        let Some(def) = value.def() else {
            return;
        };
        let data = self.value_data(def);
        debug_assert!(
            (value.result_number() as usize) < data.types.len(),
            "{} names a result {} does not produce",
            value,
            def
        );
        let head = data.first_use;
        {
            let data = self.operand_data_mut(op);
            data.back = Some(UseSlot::Head(def));
            data.next_use = head;
        }
        if let Some(head) = head {
            self.operand_data_mut(head).back = Some(UseSlot::Next(op));
        }
        self.value_data_mut(def).first_use = Some(op);
    }

    fn write_slot(&mut self, slot: UseSlot, target: Option<OperandId>) {
        match slot {
            UseSlot::Head(value) => self.value_data_mut(value).first_use = target,
            UseSlot::Next(op) => self.operand_data_mut(op).next_use = target,
        }
    }

    fn check_live(&self, id: ValueId) -> Result<()> {
        if self.contains_value(id) {
            Ok(())
        } else {
            Err(Error::ValueErased { value: id })
        }
    }

    // =========================================================================
    // Raw table access (shared with the verifier and iterators)
    // =========================================================================

    pub(crate) fn value_slots(&self) -> &[ValueData] {
        &self.values
    }

    pub(crate) fn operand_slots(&self) -> &[OperandSlot] {
        &self.operands
    }

    pub(crate) fn value_data(&self, id: ValueId) -> &ValueData {
        match self.values.get(id.0 as usize) {
            Some(data) if !data.erased => data,
            Some(_) => panic!("use of erased value {}", id),
            None => panic!("{} is not a value of this context", id),
        }
    }

    pub(crate) fn value_data_mut(&mut self, id: ValueId) -> &mut ValueData {
        match self.values.get_mut(id.0 as usize) {
            Some(data) if !data.erased => data,
            Some(_) => panic!("use of erased value {}", id),
            None => panic!("{} is not a value of this context", id),
        }
    }

    pub(crate) fn operand_data(&self, op: OperandId) -> &OperandData {
        match self.operands.get(op.0 as usize) {
            Some(OperandSlot::Occupied(data)) => data,
            Some(OperandSlot::Vacant { .. }) => panic!("use of released operand {}", op),
            None => panic!("{} is not an operand of this context", op),
        }
    }

    pub(crate) fn operand_data_mut(&mut self, op: OperandId) -> &mut OperandData {
        match self.operands.get_mut(op.0 as usize) {
            Some(OperandSlot::Occupied(data)) => data,
            Some(OperandSlot::Vacant { .. }) => panic!("use of released operand {}", op),
            None => panic!("{} is not an operand of this context", op),
        }
    }
}

fn expect_def(value: Value) -> ValueId {
    match value.def() {
        Some(def) => def,
        None => panic!("use of the invalid value handle"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(ctx: &mut UseDefContext) -> ValueId {
        ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0))
    }

    #[test]
    fn test_link_at_head() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));

        let a = ctx.create_operand(user, v.into());
        let b = ctx.create_operand(user, v.into());
        let c = ctx.create_operand(user, v.into());

        let order: Vec<_> = ctx.uses(v).collect();
        assert_eq!(order, vec![c.id(), b.id(), a.id()]);
        assert_eq!(ctx.use_count(v), 3);
        ctx.verify().unwrap();

        for op in [a, b, c] {
            ctx.release_operand(op);
        }
        assert!(ctx.uses_empty(v));
    }

    #[test]
    fn test_unlink_middle_keeps_order() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));

        let a = ctx.create_operand(user, v.into());
        let b = ctx.create_operand(user, v.into());
        let c = ctx.create_operand(user, v.into());
        let (a_id, c_id) = (a.id(), c.id());

        ctx.release_operand(b);
        assert_eq!(ctx.uses(v).collect::<Vec<_>>(), vec![c_id, a_id]);
        ctx.verify().unwrap();

        ctx.release_operand(c);
        assert_eq!(ctx.uses(v).collect::<Vec<_>>(), vec![a_id]);
        assert!(ctx.has_one_use(v));
        ctx.release_operand(a);
        assert!(ctx.uses_empty(v));
        ctx.verify().unwrap();
    }

    #[test]
    fn test_set_moves_between_lists() {
        let mut ctx = UseDefContext::new();
        let x = literal(&mut ctx);
        let y = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Load, TypeRef(1));

        let op = ctx.create_operand(user, x.into());
        op.set(&mut ctx, y.into());

        assert!(ctx.uses_empty(x));
        assert_eq!(ctx.uses(y).collect::<Vec<_>>(), vec![op.id()]);
        assert_eq!(op.get(&ctx), Value::from(y));
        assert_eq!(op.user(&ctx), user);
        ctx.verify().unwrap();
        ctx.release_operand(op);
    }

    #[test]
    fn test_set_same_target_moves_to_head() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));

        let a = ctx.create_operand(user, v.into());
        let b = ctx.create_operand(user, v.into());
        ctx.set(a.id(), v.into());

        assert_eq!(ctx.uses(v).collect::<Vec<_>>(), vec![a.id(), b.id()]);
        ctx.verify().unwrap();
        ctx.release_operand(a);
        ctx.release_operand(b);
    }

    #[test]
    fn test_invalid_target_stays_unlinked() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Return, ResultTypes::none());

        let op = ctx.create_operand(user, Value::INVALID);
        assert!(!ctx.is_linked(op.id()));

        ctx.set(op.id(), v.into());
        assert!(ctx.is_linked(op.id()));

        ctx.set(op.id(), Value::INVALID);
        assert!(!ctx.is_linked(op.id()));
        assert!(ctx.uses_empty(v));
        ctx.release_operand(op);
    }

    #[test]
    fn test_slot_recycling() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));

        let a = ctx.create_operand(user, v.into());
        let a_id = a.id();
        ctx.release_operand(a);
        let b = ctx.create_operand(user, v.into());
        assert_eq!(b.id(), a_id);
        ctx.release_operand(b);

        let mut ctx = UseDefContext::with_options(ContextOptions::default().recycle_operand_slots(false));
        let v = literal(&mut ctx);
        let a = ctx.create_operand(v, Value::INVALID);
        let a_id = a.id();
        ctx.release_operand(a);
        let b = ctx.create_operand(v, Value::INVALID);
        assert_ne!(b.id(), a_id);
        ctx.release_operand(b);
    }

    #[test]
    fn test_released_operand_leaves_no_use() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Load, TypeRef(1));
        {
            let op = ctx.create_operand(user, v.into());
            ctx.release_operand(op);
        }
        assert!(ctx.uses_empty(v));
        assert_eq!(ctx.stats().live_operands(), 0);
        ctx.erase_value(v).unwrap();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "dropped without being released")]
    fn test_dropped_operand_is_reported() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Load, TypeRef(1));
        {
            let _op = ctx.create_operand(user, v.into());
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not produce")]
    fn test_link_to_missing_result_panics() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let op = ctx.create_operand(user, Value::INVALID);
        ctx.set(op.id(), Value::new(v, 1));
        ctx.release_operand(op);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not a live value")]
    fn test_erased_owner_panics() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        ctx.erase_value(user).unwrap();
        let op = ctx.create_operand(user, v.into());
        ctx.release_operand(op);
    }

    #[test]
    fn test_erase_requires_no_uses() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Load, TypeRef(1));
        let op = ctx.create_operand(user, v.into());

        assert_eq!(
            ctx.erase_value(v),
            Err(Error::ValueHasUses { value: v, uses: 1 })
        );
        ctx.release_operand(op);
        ctx.erase_value(v).unwrap();
        assert!(!ctx.contains_value(v));
        assert_eq!(ctx.erase_value(v), Err(Error::ValueErased { value: v }));
        assert_eq!(ctx.live_values().collect::<Vec<_>>(), vec![user]);
    }

    #[test]
    #[should_panic(expected = "use of erased value")]
    fn test_erased_value_access_panics() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        ctx.erase_value(v).unwrap();
        ctx.kind(v);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_type_index_out_of_range() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        ctx.ty(v, 1);
    }

    #[test]
    #[should_panic(expected = "at most")]
    fn test_too_many_results() {
        let mut ctx = UseDefContext::new();
        ctx.create_value(ValueKind::Apply, vec![TypeRef(0); MAX_RESULTS as usize + 1]);
    }

    #[test]
    fn test_types_and_kind() {
        let mut ctx = UseDefContext::new();
        let pair = ctx.create_value(ValueKind::AllocStack, [TypeRef(4), TypeRef(5)]);
        assert_eq!(ctx.kind(pair), ValueKind::AllocStack);
        assert_eq!(ctx.result_count(pair), 2);
        assert_eq!(ctx.ty(pair, 1), TypeRef(5));
        assert_eq!(ctx.value_type(Value::new(pair, 0)), TypeRef(4));
    }

    #[test]
    fn test_replace_all_uses_with_single_result() {
        let mut ctx = UseDefContext::new();
        let pair = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let other = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(2));

        let u0 = ctx.create_operand(user, Value::new(pair, 0));
        let u1 = ctx.create_operand(user, Value::new(pair, 1));
        let u2 = ctx.create_operand(user, Value::new(pair, 0));

        let moved = ctx
            .replace_all_uses_with(Value::new(pair, 0), Value::new(other, 1))
            .unwrap();
        assert_eq!(moved, 2);
        assert_eq!(ctx.get(u0.id()), Value::new(other, 1));
        assert_eq!(ctx.get(u2.id()), Value::new(other, 1));
        assert_eq!(ctx.uses(pair).collect::<Vec<_>>(), vec![u1.id()]);
        ctx.verify().unwrap();

        assert_eq!(
            ctx.replace_all_uses_with(Value::new(pair, 1), Value::INVALID),
            Err(Error::InvalidValue(Value::INVALID))
        );

        for op in [u0, u1, u2] {
            ctx.release_operand(op);
        }
    }

    #[test]
    fn test_replace_all_uses_with_missing_result() {
        let mut ctx = UseDefContext::new();
        let a = literal(&mut ctx);
        let single = literal(&mut ctx);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(2));
        let op = ctx.create_operand(user, a.into());

        assert_eq!(
            ctx.replace_all_uses_with(Value::from(a), Value::new(single, 1)),
            Err(Error::ResultCountMismatch {
                from: a,
                to: single,
                result: 1,
                available: 1,
            })
        );
        assert_eq!(ctx.get(op.id()), Value::from(a));
        assert!(ctx.uses_empty(single));
        ctx.verify().unwrap();
        ctx.release_operand(op);
    }

    #[test]
    fn test_replace_all_uses_with_sibling_result() {
        let mut ctx = UseDefContext::new();
        let pair = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(2));

        let u0 = ctx.create_operand(user, Value::new(pair, 0));
        let u1 = ctx.create_operand(user, Value::new(pair, 1));
        let u2 = ctx.create_operand(user, Value::new(pair, 0));

        // Every moved edge is relinked at the head of the list being walked
        let moved = ctx
            .replace_all_uses_with(Value::new(pair, 0), Value::new(pair, 1))
            .unwrap();
        assert_eq!(moved, 2);
        assert!(ctx.result_uses_empty(Value::new(pair, 0)));
        assert_eq!(
            ctx.uses(pair).collect::<Vec<_>>(),
            vec![u0.id(), u2.id(), u1.id()]
        );
        assert_eq!(ctx.result_uses(Value::new(pair, 1)).count(), 3);
        ctx.verify().unwrap();

        for op in [u0, u1, u2] {
            ctx.release_operand(op);
        }
    }

    #[test]
    fn test_replace_all_uses_of_def() {
        let mut ctx = UseDefContext::new();
        let pair = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let single = literal(&mut ctx);
        let other = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(2));

        let a = ctx.create_operand(user, Value::new(pair, 0));
        let b = ctx.create_operand(user, Value::new(pair, 1));

        let err = ctx.replace_all_uses_of_def(pair, single).unwrap_err();
        assert!(matches!(err, Error::ResultCountMismatch { result: 1, .. }));
        assert_eq!(ctx.use_count(pair), 2);

        assert_eq!(ctx.replace_all_uses_of_def(pair, other).unwrap(), 2);
        assert!(ctx.uses_empty(pair));
        assert_eq!(ctx.get(a.id()), Value::new(other, 0));
        assert_eq!(ctx.get(b.id()), Value::new(other, 1));
        ctx.verify().unwrap();
        ctx.release_operand(a);
        ctx.release_operand(b);
    }

    #[test]
    fn test_single_result_use() {
        let mut ctx = UseDefContext::new();
        let pair = ctx.create_value(ValueKind::AllocStack, [TypeRef(0), TypeRef(1)]);
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(2));
        let a = ctx.create_operand(user, Value::new(pair, 1));
        let b = ctx.create_operand(user, Value::new(pair, 0));
        let c = ctx.create_operand(user, Value::new(pair, 0));

        assert_eq!(ctx.single_result_use(Value::new(pair, 1)), Some(a.id()));
        assert_eq!(ctx.single_result_use(Value::new(pair, 0)), None);
        assert!(!ctx.has_one_use(pair));
        assert_eq!(ctx.users(pair).collect::<Vec<_>>(), vec![user; 3]);
        for op in [a, b, c] {
            ctx.release_operand(op);
        }
    }

    #[test]
    fn test_stats_track_live_counts() {
        let mut ctx = UseDefContext::new();
        let v = literal(&mut ctx);
        let a = ctx.create_operand(v, Value::INVALID);
        let b = ctx.create_operand(v, Value::INVALID);
        ctx.release_operand(a);

        let stats = ctx.stats();
        assert_eq!(stats.operands_created, 2);
        assert_eq!(stats.operands_released, 1);
        assert_eq!(stats.live_operands(), 1);
        assert_eq!(stats.live_values(), 1);
        ctx.release_operand(b);
    }
}
