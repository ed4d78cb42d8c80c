//! CSS Values and Units Module Level 3 — §8.1 Mathematical Expressions: `calc()`.
//! Spec: <https://www.w3.org/TR/css-values-3/#calc-notation>
//!
//! ## Pipeline
//!
//! ```text
//! calc() body (cssparser tokens)
//!   ↓ syntax::parse_calc_terms
//! infix terms
//!   ↓ CalcArgs::build (shunting yard + type checking)
//! postfix terms + result type
//!   ↓ CalcArgs::evaluate(strategy)
//! String / f64 / caller-defined result
//! ```
//!
//! A `CalcArgs` is immutable once built and can be evaluated any number of
//! times with different strategies.

#![forbid(unsafe_code)]

use std::fmt;

// Per-chapter modules mirroring the spec table of contents.
pub mod chapter_6_dimensions;
pub mod chapter_8_calc;

// Re-exports for ergonomic access from other crates.
pub use chapter_6_dimensions::{LengthContext, Unit, UnitType, Viewport};
pub use chapter_8_calc::{
    CalcArgs, CalcDiagnostic, CalcError, CalcEvaluator, DiagnosticsSink, DoubleEvaluator,
    LogDiagnostics, Operand, OperandKind, Operator, StringEvaluator, Term, TypeMismatch,
    TypeTracker, ValueResolver, parse_calc, parse_calc_terms,
};

/// Parse error for the `calc()` syntax adapter in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The next token did not match the expected grammar.
    UnexpectedToken,
    /// A function token was found, but it was not `calc(`.
    NotCalcFunction,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken => write!(formatter, "unexpected token in calc() expression"),
            Self::NotCalcFunction => write!(formatter, "expected a calc() function"),
        }
    }
}

impl std::error::Error for ParseError {}
