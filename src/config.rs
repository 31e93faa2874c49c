//! Configuration for a [`UseDefContext`](crate::UseDefContext)

/// Arena sizing and slot policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Initial capacity of the value table
    pub value_capacity: usize,
    /// Initial capacity of the edge table
    pub operand_capacity: usize,
    /// Reuse released edge slots before growing the edge table
    pub recycle_operand_slots: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            value_capacity: 256,
            operand_capacity: 512,
            recycle_operand_slots: true,
        }
    }
}

impl ContextOptions {
    /// Set the initial value table capacity
    pub fn value_capacity(mut self, capacity: usize) -> Self {
        self.value_capacity = capacity;
        self
    }

    /// Set the initial edge table capacity
    pub fn operand_capacity(mut self, capacity: usize) -> Self {
        self.operand_capacity = capacity;
        self
    }

    /// Enable or disable edge slot recycling.
    ///
    /// With recycling off, every released [`OperandId`](crate::OperandId)
    /// stays retired, which makes stale ids easier to spot while debugging a
    /// pass.
    pub fn recycle_operand_slots(mut self, recycle: bool) -> Self {
        self.recycle_operand_slots = recycle;
        self
    }
}
