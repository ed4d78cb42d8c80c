//! Terms of a `calc()` expression as handed over by the value parser.

use crate::chapter_6_dimensions::{Unit, UnitType};
use std::fmt;

/// Arithmetic operators and grouping parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    OpenParen,
    CloseParen,
}

impl Operator {
    /// Map a delimiter character to an operator.
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '(' => Some(Self::OpenParen),
            ')' => Some(Self::CloseParen),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::OpenParen => '(',
            Self::CloseParen => ')',
        }
    }

    /// Binding strength of a binary operator; parentheses have none.
    pub const fn precedence(self) -> Option<u8> {
        match self {
            Self::Add | Self::Subtract => Some(0),
            Self::Multiply | Self::Divide => Some(1),
            Self::OpenParen | Self::CloseParen => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.symbol())
    }
}

/// The CSS token kind an operand came from.
#[derive(Clone, Debug, PartialEq)]
pub enum OperandKind {
    /// `<integer>`
    Integer,
    /// `<number>` with a fractional or exponent part
    Number,
    /// `<percentage>`, value in [0..100]
    Percentage,
    /// `<dimension>`
    Dimension(Unit),
}

/// A numeric operand, immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Operand {
    value: f32,
    kind: OperandKind,
}

impl Operand {
    pub fn integer(value: i32) -> Self {
        Self {
            value: value as f32,
            kind: OperandKind::Integer,
        }
    }

    pub const fn number(value: f32) -> Self {
        Self {
            value,
            kind: OperandKind::Number,
        }
    }

    /// A percentage; `50.0` means `50%`.
    pub const fn percentage(value: f32) -> Self {
        Self {
            value,
            kind: OperandKind::Percentage,
        }
    }

    pub const fn dimension(value: f32, unit: Unit) -> Self {
        Self {
            value,
            kind: OperandKind::Dimension(unit),
        }
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn kind(&self) -> &OperandKind {
        &self.kind
    }

    pub const fn unit(&self) -> Option<&Unit> {
        match &self.kind {
            OperandKind::Dimension(unit) => Some(unit),
            OperandKind::Integer | OperandKind::Number | OperandKind::Percentage => None,
        }
    }

    /// Dimension family of the attached unit, `UnitType::None` when there is none.
    pub const fn unit_type(&self) -> UnitType {
        match &self.kind {
            OperandKind::Dimension(unit) => unit.unit_type(),
            OperandKind::Integer | OperandKind::Number | OperandKind::Percentage => {
                UnitType::None
            }
        }
    }

    pub const fn is_percentage(&self) -> bool {
        matches!(self.kind, OperandKind::Percentage)
    }

    /// `<number>` or `<integer>`.
    pub const fn is_bare_number(&self) -> bool {
        matches!(self.kind, OperandKind::Integer | OperandKind::Number)
    }

    /// Only `<integer>` tokens count; `2.0` is a `<number>`.
    pub const fn is_integer_valued(&self) -> bool {
        matches!(self.kind, OperandKind::Integer)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperandKind::Integer | OperandKind::Number => write!(formatter, "{}", self.value),
            OperandKind::Percentage => write!(formatter, "{}%", self.value),
            OperandKind::Dimension(unit) => write!(formatter, "{}{unit}", self.value),
        }
    }
}

/// One token of a `calc()` expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Operand(Operand),
    Operator(Operator),
    /// Anything the value parser could not classify, kept as its CSS text.
    Other(String),
}

impl From<Operand> for Term {
    fn from(operand: Operand) -> Self {
        Self::Operand(operand)
    }
}

impl From<Operator> for Term {
    fn from(operator: Operator) -> Self {
        Self::Operator(operator)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => fmt::Display::fmt(operand, formatter),
            Self::Operator(operator) => fmt::Display::fmt(operator, formatter),
            Self::Other(text) => formatter.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_symbols_round_trip() {
        for symbol in ['+', '-', '*', '/', '(', ')'] {
            assert_eq!(Operator::from_symbol(symbol).map(Operator::symbol), Some(symbol));
        }
        assert_eq!(Operator::from_symbol(','), None);
    }

    #[test]
    fn precedence_table() {
        assert_eq!(Operator::Add.precedence(), Operator::Subtract.precedence());
        assert!(Operator::Multiply.precedence() > Operator::Add.precedence());
        assert_eq!(Operator::OpenParen.precedence(), None);
    }

    #[test]
    fn operand_classification() {
        let px = Operand::dimension(3.0, Unit::Pixels);
        assert_eq!(px.unit_type(), UnitType::Length);
        assert!(!px.is_bare_number());
        let percent = Operand::percentage(50.0);
        assert!(percent.is_percentage());
        assert_eq!(percent.unit(), None);
        assert!(Operand::integer(2).is_integer_valued());
        assert!(!Operand::number(2.0).is_integer_valued());
    }

    #[test]
    fn css_literal_rendering() {
        assert_eq!(Operand::integer(3).to_string(), "3");
        assert_eq!(Operand::number(2.5).to_string(), "2.5");
        assert_eq!(Operand::percentage(50.0).to_string(), "50%");
        assert_eq!(Operand::dimension(1.5, Unit::RootEms).to_string(), "1.5rem");
        assert_eq!(Term::Other("auto".to_owned()).to_string(), "auto");
    }
}
