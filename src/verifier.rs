//! # Use-List Verifier
//!
//! Walks every use list of a [`UseDefContext`] and checks the linkage
//! invariants passes rely on.
//! Meant for tests and debug builds of pass pipelines, not the hot path.

use crate::ir::context::UseDefContext;
use crate::ir::operand::{OperandSlot, UseSlot};
use crate::ir::{OperandId, Value, ValueId};

/// Verification result with warnings
#[derive(Debug)]
pub struct VerifyResult {
    /// Use lists are consistent
    pub valid: bool,
    /// Broken invariants
    pub errors: Vec<VerifyError>,
    /// Warnings (non-fatal)
    pub warnings: Vec<String>,
    /// Statistics
    pub stats: UseGraphStats,
}

/// Use graph statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UseGraphStats {
    /// Values not erased
    pub live_values: usize,
    /// Erased value tombstones
    pub erased_values: usize,
    /// Edges currently allocated
    pub live_operands: usize,
    /// Edges with no target
    pub unlinked_operands: usize,
    /// Vacant edge slots
    pub vacant_operand_slots: usize,
    /// Sum of all use-list lengths
    pub total_uses: usize,
    /// Longest use list
    pub max_use_list_len: usize,
}

/// Verification error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// A use list revisits an edge.
    UseListCycle {
        /// Value whose list loops
        value: ValueId,
    },

    /// An edge is reachable from the use lists of two values.
    SharedUse {
        /// The edge
        operand: OperandId,
        /// Value whose list reached it first
        first: ValueId,
        /// Value whose list reached it again
        second: ValueId,
    },

    /// A use list reaches a vacant or out-of-table slot.
    DanglingUse {
        /// Value whose list holds the stale link
        value: ValueId,
        /// The stale edge id
        operand: OperandId,
    },

    /// An edge's back slot does not name the slot that points at it.
    BrokenBackLink {
        /// The edge
        operand: OperandId,
        /// Slot that actually points at it
        expected: UseSlot,
        /// Slot recorded on the edge
        found: Option<UseSlot>,
    },

    /// An edge sits in the use list of a value it does not target.
    ForeignUse {
        /// Value whose list holds the edge
        value: ValueId,
        /// The edge
        operand: OperandId,
        /// What the edge actually targets
        target: Value,
    },

    /// An edge names a result its value does not produce.
    ResultOutOfRange {
        /// The edge
        operand: OperandId,
        /// Its target
        target: Value,
        /// Result count of the target's value
        results: usize,
    },

    /// A targeted edge is missing from its target's use list.
    MissingFromUseList {
        /// The edge
        operand: OperandId,
        /// Its target
        target: Value,
    },

    /// An edge targets a value that was erased.
    UseOfErasedValue {
        /// The edge
        operand: OperandId,
        /// The erased value
        value: ValueId,
    },

    /// An edge without a target still records a back slot.
    StaleBackLink {
        /// The edge
        operand: OperandId,
    },
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::UseListCycle { value } => {
                write!(f, "Use list of {} contains a cycle", value)
            }
            VerifyError::SharedUse {
                operand,
                first,
                second,
            } => {
                write!(
                    f,
                    "{} is in the use lists of both {} and {}",
                    operand, first, second
                )
            }
            VerifyError::DanglingUse { value, operand } => {
                write!(f, "Use list of {} reaches released operand {}", value, operand)
            }
            VerifyError::BrokenBackLink {
                operand,
                expected,
                found,
            } => match found {
                Some(found) => write!(
                    f,
                    "{} has back link {} but is pointed at by {}",
                    operand, found, expected
                ),
                None => write!(
                    f,
                    "{} has no back link but is pointed at by {}",
                    operand, expected
                ),
            },
            VerifyError::ForeignUse {
                value,
                operand,
                target,
            } => {
                write!(f, "{} is in the use list of {} but targets {}", operand, value, target)
            }
            VerifyError::ResultOutOfRange {
                operand,
                target,
                results,
            } => {
                write!(
                    f,
                    "{} targets {} but the value has {} result(s)",
                    operand, target, results
                )
            }
            VerifyError::MissingFromUseList { operand, target } => {
                write!(f, "{} targets {} but is not in its use list", operand, target)
            }
            VerifyError::UseOfErasedValue { operand, value } => {
                write!(f, "{} targets erased value {}", operand, value)
            }
            VerifyError::StaleBackLink { operand } => {
                write!(f, "{} has no target but is still linked", operand)
            }
        }
    }
}

/// Use-list verifier
#[derive(Debug, Default)]
pub struct Verifier {
    /// Treat warnings as errors
    strict: bool,
}

impl Verifier {
    /// Creates a verifier that only fails on broken invariants
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Enable strict mode: targetless edges also fail verification
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Verify every use list in `ctx`
    pub fn verify(&self, ctx: &UseDefContext) -> VerifyResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut stats = UseGraphStats::default();

        let operand_slots = ctx.operand_slots();
        // Value whose use list reached each edge
        let mut seen: Vec<Option<ValueId>> = vec![None; operand_slots.len()];

        for (index, data) in ctx.value_slots().iter().enumerate() {
            let value = ValueId(index as u32);
            if data.erased {
                stats.erased_values += 1;
                if data.first_use.is_some() {
                    warnings.push(format!("erased value {} still has a use list head", value));
                }
                continue;
            }
            stats.live_values += 1;

            let results = data.types.len();
            let mut expected = UseSlot::Head(value);
            let mut cur = data.first_use;
            let mut len = 0usize;

            while let Some(op) = cur {
                let Some(OperandSlot::Occupied(edge)) = operand_slots.get(op.0 as usize) else {
                    errors.push(VerifyError::DanglingUse { value, operand: op });
                    break;
                };
                match seen[op.0 as usize] {
                    Some(first) if first == value => {
                        errors.push(VerifyError::UseListCycle { value });
                        break;
                    }
                    Some(first) => {
                        errors.push(VerifyError::SharedUse {
                            operand: op,
                            first,
                            second: value,
                        });
                        break;
                    }
                    None => seen[op.0 as usize] = Some(value),
                }
                len += 1;

                if edge.back != Some(expected) {
                    errors.push(VerifyError::BrokenBackLink {
                        operand: op,
                        expected,
                        found: edge.back,
                    });
                }
                if edge.value.def() != Some(value) {
                    errors.push(VerifyError::ForeignUse {
                        value,
                        operand: op,
                        target: edge.value,
                    });
                } else if edge.value.result_number() as usize >= results {
                    errors.push(VerifyError::ResultOutOfRange {
                        operand: op,
                        target: edge.value,
                        results,
                    });
                }

                expected = UseSlot::Next(op);
                cur = edge.next_use;
            }

            stats.total_uses += len;
            stats.max_use_list_len = stats.max_use_list_len.max(len);
        }

        for (index, slot) in operand_slots.iter().enumerate() {
            let operand = OperandId(index as u32);
            let OperandSlot::Occupied(edge) = slot else {
                stats.vacant_operand_slots += 1;
                continue;
            };
            stats.live_operands += 1;

            match edge.value.def() {
                None => {
                    stats.unlinked_operands += 1;
                    if edge.back.is_some() {
                        errors.push(VerifyError::StaleBackLink { operand });
                    }
                    warnings.push(format!("{} owned by {} has no target", operand, edge.owner));
                }
                Some(value) if !ctx.contains_value(value) => {
                    errors.push(VerifyError::UseOfErasedValue { operand, value });
                }
                Some(_) if seen[index].is_none() => {
                    errors.push(VerifyError::MissingFromUseList {
                        operand,
                        target: edge.value,
                    });
                }
                Some(_) => {}
            }
        }

        let valid = errors.is_empty() && (!self.strict || warnings.is_empty());
        if valid {
            tracing::debug!(
                "verified {} value(s), {} use(s)",
                stats.live_values,
                stats.total_uses
            );
        } else {
            tracing::warn!(
                "use-list verification failed: {} error(s), {} warning(s)",
                errors.len(),
                warnings.len()
            );
        }

        VerifyResult {
            valid,
            errors,
            warnings,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FixedOperandList, OperandList, TypeRef, ValueKind};

    #[test]
    fn test_verify_clean_graph() {
        let mut ctx = UseDefContext::new();
        let a = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let b = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let list = FixedOperandList::new(&mut ctx, user, [a.into(), b.into(), a.into()]);

        let result = Verifier::new().verify(&ctx);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.stats.live_values, 3);
        assert_eq!(result.stats.total_uses, 3);
        assert_eq!(result.stats.max_use_list_len, 2);
        list.release(&mut ctx);
    }

    #[test]
    fn test_strict_mode_rejects_targetless_edges() {
        let mut ctx = UseDefContext::new();
        let a = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let list = FixedOperandList::new(&mut ctx, user, [a.into()]);
        list.drop_all_references(&mut ctx);

        let relaxed = Verifier::new().verify(&ctx);
        assert!(relaxed.valid);
        assert_eq!(relaxed.warnings.len(), 1);
        assert_eq!(relaxed.stats.unlinked_operands, 1);

        let strict = Verifier::new().strict().verify(&ctx);
        assert!(!strict.valid);
        list.release(&mut ctx);
    }

    #[test]
    fn test_result_out_of_range_detected() {
        let mut ctx = UseDefContext::new();
        let a = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let op = ctx.create_operand(user, a.into());
        // Result 1 of a single-result value: representable, but not produced
        ctx.operand_data_mut(op.id()).value = Value::new(a, 1);

        let result = Verifier::new().verify(&ctx);
        assert!(!result.valid);
        assert!(matches!(
            result.errors[0],
            VerifyError::ResultOutOfRange { results: 1, .. }
        ));
        assert!(ctx.verify().is_err());

        ctx.operand_data_mut(op.id()).value = a.into();
        ctx.release_operand(op);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut ctx = UseDefContext::new();
        let a = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let op = ctx.create_operand(user, a.into());
        ctx.operand_data_mut(op.id()).next_use = Some(op.id());

        let result = Verifier::new().verify(&ctx);
        assert!(!result.valid);
        assert!(result
            .errors
            .contains(&VerifyError::UseListCycle { value: a }));

        ctx.operand_data_mut(op.id()).next_use = None;
        ctx.release_operand(op);
    }

    #[test]
    fn test_edge_in_two_lists_is_not_a_cycle() {
        let mut ctx = UseDefContext::new();
        let a = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let b = ctx.create_value(ValueKind::IntegerLiteral, TypeRef(0));
        let user = ctx.create_value(ValueKind::Tuple, TypeRef(1));
        let op = ctx.create_operand(user, a.into());
        ctx.value_data_mut(b).first_use = Some(op.id());

        let result = Verifier::new().verify(&ctx);
        assert!(!result.valid);
        assert!(result.errors.contains(&VerifyError::SharedUse {
            operand: op.id(),
            first: a,
            second: b,
        }));
        assert!(!result
            .errors
            .iter()
            .any(|err| matches!(err, VerifyError::UseListCycle { .. })));

        ctx.value_data_mut(b).first_use = None;
        ctx.release_operand(op);
        ctx.verify().unwrap();
    }

    #[test]
    fn test_error_display() {
        let err = VerifyError::BrokenBackLink {
            operand: OperandId(2),
            expected: UseSlot::Head(ValueId(0)),
            found: None,
        };
        assert_eq!(
            err.to_string(),
            "op2 has no back link but is pointed at by v0.first_use"
        );
    }
}
