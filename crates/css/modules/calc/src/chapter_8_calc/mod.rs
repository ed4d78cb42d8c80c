//! CSS Values & Units Level 3 — §8.1 Mathematical Expressions: `calc()`
//! Spec: <https://www.w3.org/TR/css-values-3/#calc-notation>

// Spec: §8.1.1 — Syntax (cssparser tokens to terms)
mod syntax;
// Term model shared by every stage
mod terms;
// Spec: §8.1.3 — Type Checking
mod type_checking;
// Infix to postfix conversion
mod shunting_yard;
// Postfix evaluation strategies
mod evaluation;

pub use evaluation::{
    CalcDiagnostic, CalcError, CalcEvaluator, DiagnosticsSink, DoubleEvaluator, LogDiagnostics,
    StringEvaluator, ValueResolver,
};
pub use shunting_yard::CalcArgs;
pub use syntax::{parse_calc, parse_calc_terms};
pub use terms::{Operand, OperandKind, Operator, Term};
pub use type_checking::{TypeMismatch, TypeTracker};
