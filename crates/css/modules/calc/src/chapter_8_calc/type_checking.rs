//! §8.1.3 Type Checking
//! Spec: <https://www.w3.org/TR/css-values-3/#calc-type-checking>
//!
//! Unitless numbers mix freely with one dimension family (`2 * 3px`), two
//! different families never do (`3px + 3deg`). Percentages count as lengths.

use super::terms::Operand;
use crate::chapter_6_dimensions::UnitType;

/// A unit type conflict found while scanning operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: UnitType,
    pub found: UnitType,
}

/// Running result type of an expression, updated operand by operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeTracker {
    result_type: UnitType,
    is_integer: bool,
}

impl Default for TypeTracker {
    fn default() -> Self {
        Self {
            result_type: UnitType::None,
            is_integer: true,
        }
    }
}

impl TypeTracker {
    /// Fold the next operand (in scan order) into the running type.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the operand carries a dimension different
    /// from the one already fixed. The tracker is left unchanged.
    pub fn consider(&mut self, operand: &Operand) -> Result<(), TypeMismatch> {
        let operand_type = operand.unit_type();
        if self.result_type == UnitType::None {
            if operand_type != UnitType::None {
                self.result_type = operand_type;
            } else if operand.is_percentage() {
                self.result_type = UnitType::Length;
            } else if operand.is_bare_number() {
                self.is_integer = self.is_integer && operand.is_integer_valued();
            }
            return Ok(());
        }
        if operand_type != UnitType::None && operand_type != self.result_type {
            return Err(TypeMismatch {
                expected: self.result_type,
                found: operand_type,
            });
        }
        Ok(())
    }

    pub const fn result_type(&self) -> UnitType {
        self.result_type
    }

    pub const fn is_integer(&self) -> bool {
        self.is_integer
    }
}
