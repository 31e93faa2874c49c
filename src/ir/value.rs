//! Value identities and result handles
//!
//! A [`ValueId`] names one IR node capable of producing results. A [`Value`]
//! names one specific result of such a node and is the unit every operand
//! edge points at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits reserved for a result number inside a [`Value`].
///
/// Everything that depends on the maximum result count derives from this
/// constant; widening it is a single-point change.
pub const RESULT_NUMBER_BITS: u32 = 1;

/// Maximum number of results a single value identity can produce.
pub const MAX_RESULTS: u32 = 1 << RESULT_NUMBER_BITS;

const RESULT_MASK: u32 = MAX_RESULTS - 1;

/// Largest value index that still fits the packed handle encoding.
pub const MAX_VALUE_INDEX: u32 = (u32::MAX >> RESULT_NUMBER_BITS) - 1;

/// Index of a value identity in a [`UseDefContext`](super::UseDefContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId(pub(crate) u32);

impl ValueId {
    /// Raw index into the value table
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque reference to a result type owned by the type system.
///
/// The use-def core never inspects types, it only stores and forwards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRef(pub u32);

impl TypeRef {
    /// Wraps a type-system handle
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ty{}", self.0)
    }
}

/// Kind tag of a value identity.
///
/// Closed set; new node kinds are added as variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    // Arguments
    /// Incoming function argument
    FunctionArgument,
    /// Basic block argument (phi replacement)
    BlockArgument,

    // Literals
    /// Integer constant
    IntegerLiteral,
    /// Floating point constant
    FloatLiteral,
    /// String constant
    StringLiteral,
    /// Reference to a function symbol
    FunctionRef,

    // Instructions
    /// Stack allocation: produces the container and the address
    AllocStack,
    /// Load from an address
    Load,
    /// Store to an address (no results)
    Store,
    /// Function application
    Apply,
    /// Builtin call
    Builtin,
    /// Aggregate tuple construction
    Tuple,
    /// Tuple element projection
    TupleExtract,
    /// Struct field projection
    StructExtract,

    // Terminators
    /// Return from the function
    Return,
    /// Unconditional branch
    Branch,
    /// Two-way conditional branch
    CondBranch,
    /// Unreachable terminator
    Unreachable,
}

impl ValueKind {
    /// Returns true for function and block arguments
    pub fn is_argument(self) -> bool {
        matches!(self, ValueKind::FunctionArgument | ValueKind::BlockArgument)
    }

    /// Returns true for literal kinds
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            ValueKind::IntegerLiteral
                | ValueKind::FloatLiteral
                | ValueKind::StringLiteral
                | ValueKind::FunctionRef
        )
    }

    /// Returns true for block terminators
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            ValueKind::Return | ValueKind::Branch | ValueKind::CondBranch | ValueKind::Unreachable
        )
    }

    /// Returns true for anything that is not an argument (literals included)
    pub fn is_instruction(self) -> bool {
        !self.is_argument()
    }

    /// Lowercase mnemonic used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::FunctionArgument => "function_argument",
            ValueKind::BlockArgument => "block_argument",
            ValueKind::IntegerLiteral => "integer_literal",
            ValueKind::FloatLiteral => "float_literal",
            ValueKind::StringLiteral => "string_literal",
            ValueKind::FunctionRef => "function_ref",
            ValueKind::AllocStack => "alloc_stack",
            ValueKind::Load => "load",
            ValueKind::Store => "store",
            ValueKind::Apply => "apply",
            ValueKind::Builtin => "builtin",
            ValueKind::Tuple => "tuple",
            ValueKind::TupleExtract => "tuple_extract",
            ValueKind::StructExtract => "struct_extract",
            ValueKind::Return => "return",
            ValueKind::Branch => "br",
            ValueKind::CondBranch => "cond_br",
            ValueKind::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result types of a value identity: one inline type or a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultTypes {
    /// Exactly one result
    Single(TypeRef),
    /// Zero or several results
    List(Box<[TypeRef]>),
}

impl ResultTypes {
    /// No results (stores, terminators)
    pub fn none() -> Self {
        ResultTypes::List(Box::new([]))
    }

    /// Borrow the types as a slice, one entry per result
    pub fn as_slice(&self) -> &[TypeRef] {
        match self {
            ResultTypes::Single(ty) => std::slice::from_ref(ty),
            ResultTypes::List(types) => types,
        }
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True when the value produces no results
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<TypeRef> for ResultTypes {
    fn from(ty: TypeRef) -> Self {
        ResultTypes::Single(ty)
    }
}

impl From<&[TypeRef]> for ResultTypes {
    fn from(types: &[TypeRef]) -> Self {
        match types {
            [ty] => ResultTypes::Single(*ty),
            _ => ResultTypes::List(types.into()),
        }
    }
}

impl<const N: usize> From<[TypeRef; N]> for ResultTypes {
    fn from(types: [TypeRef; N]) -> Self {
        ResultTypes::from(&types[..])
    }
}

impl From<Vec<TypeRef>> for ResultTypes {
    fn from(types: Vec<TypeRef>) -> Self {
        match types.as_slice() {
            [ty] => ResultTypes::Single(*ty),
            _ => ResultTypes::List(types.into_boxed_slice()),
        }
    }
}

/// A reference to one result of a value identity.
///
/// Packed into a single `u32`: the value index (plus one) in the high bits and
/// the result number in the low [`RESULT_NUMBER_BITS`] bits. Zero encodes the
/// invalid handle. Ordering and hashing therefore follow (identity, result
/// number) at the cost of a plain integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Value(u32);

impl Value {
    /// The absent handle; never linked into any use list
    pub const INVALID: Value = Value(0);

    /// Creates a handle to result `result_number` of `def`.
    ///
    /// # Panics
    ///
    /// If `result_number` does not fit in [`RESULT_NUMBER_BITS`].
    pub fn new(def: ValueId, result_number: u32) -> Self {
        assert!(
            result_number < MAX_RESULTS,
            "result number {} overflows {} bit(s)",
            result_number,
            RESULT_NUMBER_BITS
        );
        assert!(def.0 <= MAX_VALUE_INDEX, "value index {} overflows handle", def.0);
        Value(((def.0 + 1) << RESULT_NUMBER_BITS) | result_number)
    }

    /// The defining identity, `None` for the invalid handle
    pub fn def(self) -> Option<ValueId> {
        match self.0 >> RESULT_NUMBER_BITS {
            0 => None,
            n => Some(ValueId(n - 1)),
        }
    }

    /// Which result of the defining identity this handle names
    pub fn result_number(self) -> u32 {
        self.0 & RESULT_MASK
    }

    /// False only for [`Value::INVALID`]
    pub fn is_valid(self) -> bool {
        self.def().is_some()
    }

    /// Packed opaque encoding
    pub fn into_raw(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from [`Value::into_raw`]
    pub fn from_raw(raw: u32) -> Self {
        Value(raw)
    }
}

impl From<ValueId> for Value {
    fn from(def: ValueId) -> Self {
        Value::new(def, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def() {
            Some(def) => write!(f, "{}#{}", def, self.result_number()),
            None => f.write_str("<invalid>"),
        }
    }
}
