//! Postfix evaluation of `calc()` expressions.
//!
//! The traversal lives in [`CalcArgs::evaluate`]; what an operand or an
//! operator turns into is decided by a [`CalcEvaluator`] strategy, so one
//! built expression can be rendered as text, resolved to pixels, or anything
//! else a caller needs.

use super::shunting_yard::CalcArgs;
use super::terms::{Operand, Operator, Term};
use crate::chapter_6_dimensions::LengthContext;
use log::warn;
use std::fmt;

/// Strategy used by [`CalcArgs::evaluate`].
pub trait CalcEvaluator {
    /// Result domain of the evaluation.
    type Output;

    /// Turn one operand into a value.
    fn evaluate_operand(&mut self, operand: &Operand) -> Self::Output;

    /// Combine two values. `left` was pushed before `right`.
    fn evaluate_operator(
        &mut self,
        left: Self::Output,
        right: Self::Output,
        operator: Operator,
    ) -> Self::Output;
}

/// Hard failures of [`CalcArgs::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcError {
    /// The expression failed type checking or contained a foreign term.
    Invalid,
    /// Nothing to evaluate.
    Empty,
    /// An operator at `position` found fewer than two values on the stack.
    StackUnderflow { position: usize },
    /// The scan ended with more than one value on the stack.
    LeftoverOperands { count: usize },
}

impl fmt::Display for CalcError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(formatter, "calc() expression is invalid"),
            Self::Empty => write!(formatter, "calc() expression is empty"),
            Self::StackUnderflow { position } => {
                write!(formatter, "operator at position {position} is missing an operand")
            }
            Self::LeftoverOperands { count } => {
                write!(formatter, "{count} values left after evaluation, expected one")
            }
        }
    }
}

impl std::error::Error for CalcError {}

impl CalcArgs {
    /// Replay the postfix sequence against `evaluator`.
    ///
    /// # Errors
    /// - `CalcError::Invalid` when [`CalcArgs::is_valid`] is false.
    /// - `CalcError::Empty` when there are no terms.
    /// - `CalcError::StackUnderflow` when an operator lacks operands.
    /// - `CalcError::LeftoverOperands` when more than one value remains.
    pub fn evaluate<E: CalcEvaluator>(&self, evaluator: &mut E) -> Result<E::Output, CalcError> {
        if !self.is_valid() {
            return Err(CalcError::Invalid);
        }
        let mut stack: Vec<E::Output> = Vec::with_capacity(self.len());
        for (position, term) in self.iter().enumerate() {
            match term {
                Term::Operand(operand) => stack.push(evaluator.evaluate_operand(operand)),
                Term::Operator(operator) => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(CalcError::StackUnderflow { position });
                    };
                    stack.push(evaluator.evaluate_operator(left, right, *operator));
                }
                // Never emitted by a valid build.
                Term::Other(_) => return Err(CalcError::Invalid),
            }
        }
        let result = stack.pop().ok_or(CalcError::Empty)?;
        if stack.is_empty() {
            Ok(result)
        } else {
            Err(CalcError::LeftoverOperands {
                count: stack.len() + 1,
            })
        }
    }
}

/// Renders the expression fully parenthesized, e.g. `(3 + (4 * 2px))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringEvaluator;

impl CalcEvaluator for StringEvaluator {
    type Output = String;

    fn evaluate_operand(&mut self, operand: &Operand) -> String {
        operand.to_string()
    }

    fn evaluate_operator(&mut self, left: String, right: String, operator: Operator) -> String {
        format!("({left} {operator} {right})")
    }
}

/// Non-fatal problems noticed while evaluating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcDiagnostic {
    /// An operator with no arithmetic meaning (an unmatched parenthesis)
    /// reached evaluation; a placeholder value was used instead.
    UnknownOperator { operator: Operator },
}

impl fmt::Display for CalcDiagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperator { operator } => {
                write!(formatter, "unknown operator {operator} in expression")
            }
        }
    }
}

/// Receives evaluation diagnostics.
pub trait DiagnosticsSink {
    fn record(&mut self, diagnostic: CalcDiagnostic);
}

/// Discards everything.
impl DiagnosticsSink for () {
    fn record(&mut self, _diagnostic: CalcDiagnostic) {}
}

impl DiagnosticsSink for Vec<CalcDiagnostic> {
    fn record(&mut self, diagnostic: CalcDiagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn record(&mut self, diagnostic: CalcDiagnostic) {
        warn!("[CALC] {diagnostic}");
    }
}

/// Resolves a unit-bearing operand (dimension or percentage) to a number.
pub trait ValueResolver {
    fn resolve_value(&mut self, operand: &Operand) -> f64;
}

impl<F: FnMut(&Operand) -> f64> ValueResolver for F {
    fn resolve_value(&mut self, operand: &Operand) -> f64 {
        self(operand)
    }
}

/// Lengths to pixels, percentages against `percent_base_px`, other
/// dimensions to their canonical unit. Unresolvable values become `NaN`.
impl ValueResolver for LengthContext {
    fn resolve_value(&mut self, operand: &Operand) -> f64 {
        if operand.is_percentage() {
            return self.resolve_percentage(operand.value());
        }
        operand
            .unit()
            .and_then(|unit| self.resolve(operand.value(), unit))
            .unwrap_or(f64::NAN)
    }
}

/// Evaluates to `f64` with IEEE-754 arithmetic.
///
/// Bare numbers convert directly; everything else goes through the resolver.
/// Division by zero yields infinity or `NaN`, never an error.
#[derive(Clone, Debug, Default)]
pub struct DoubleEvaluator<R, D = ()> {
    resolver: R,
    diagnostics: D,
}

impl<R: ValueResolver> DoubleEvaluator<R> {
    pub const fn new(resolver: R) -> Self {
        Self {
            resolver,
            diagnostics: (),
        }
    }
}

impl<R: ValueResolver, D: DiagnosticsSink> DoubleEvaluator<R, D> {
    pub const fn with_diagnostics(resolver: R, diagnostics: D) -> Self {
        Self {
            resolver,
            diagnostics,
        }
    }

    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (R, D) {
        (self.resolver, self.diagnostics)
    }
}

impl<R: ValueResolver, D: DiagnosticsSink> CalcEvaluator for DoubleEvaluator<R, D> {
    type Output = f64;

    fn evaluate_operand(&mut self, operand: &Operand) -> f64 {
        if operand.is_bare_number() {
            f64::from(operand.value())
        } else {
            self.resolver.resolve_value(operand)
        }
    }

    fn evaluate_operator(&mut self, left: f64, right: f64, operator: Operator) -> f64 {
        match operator {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::OpenParen | Operator::CloseParen => {
                self.diagnostics
                    .record(CalcDiagnostic::UnknownOperator { operator });
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter_6_dimensions::{Unit, Viewport};

    fn int(value: i32) -> Term {
        Term::Operand(Operand::integer(value))
    }

    fn op(symbol: char) -> Term {
        Operator::from_symbol(symbol).map_or_else(|| Term::Other(symbol.to_string()), Term::Operator)
    }

    fn approx_eq(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    fn numbers_only() -> impl CalcEvaluator<Output = f64> {
        DoubleEvaluator::new(|_operand: &Operand| f64::NAN)
    }

    fn eval(terms: &[Term]) -> Result<f64, CalcError> {
        CalcArgs::build(terms).evaluate(&mut numbers_only())
    }

    #[test]
    fn sum_as_double_and_string() {
        let args = CalcArgs::build(&[int(3), op('+'), int(4)]);
        assert_eq!(args.evaluate(&mut numbers_only()).map(|val| approx_eq(val, 7.0)), Ok(true));
        assert_eq!(args.evaluate(&mut StringEvaluator), Ok("(3 + 4)".to_owned()));
    }

    #[test]
    fn left_associative_subtraction() {
        let result = eval(&[int(8), op('-'), int(3), op('-'), int(2)]);
        assert_eq!(result.map(|val| approx_eq(val, 3.0)), Ok(true));
    }

    #[test]
    fn multiplication_binds_tighter() {
        let result = eval(&[int(2), op('+'), int(3), op('*'), int(4)]);
        assert_eq!(result.map(|val| approx_eq(val, 14.0)), Ok(true));
    }

    #[test]
    fn parentheses_override_precedence() {
        let terms = [op('('), int(2), op('+'), int(3), op(')'), op('*'), int(4)];
        assert_eq!(eval(&terms).map(|val| approx_eq(val, 20.0)), Ok(true));
        assert_eq!(
            CalcArgs::build(&terms).evaluate(&mut StringEvaluator),
            Ok("((2 + 3) * 4)".to_owned())
        );
    }

    #[test]
    fn division_by_zero_follows_ieee754() {
        assert_eq!(eval(&[int(1), op('/'), int(0)]), Ok(f64::INFINITY));
        assert_eq!(eval(&[int(-1), op('/'), int(0)]), Ok(f64::NEG_INFINITY));
        assert_eq!(eval(&[int(0), op('/'), int(0)]).map(f64::is_nan), Ok(true));
    }

    #[test]
    fn unit_bearing_operands_use_the_resolver() {
        let ctx = LengthContext {
            percent_base_px: 200.0,
            viewport: Some(Viewport {
                width_px: 1000,
                height_px: 500,
            }),
            ..LengthContext::default()
        };
        let args = CalcArgs::build(&[
            Term::Operand(Operand::percentage(50.0)),
            op('-'),
            Term::Operand(Operand::dimension(2.0, Unit::Ems)),
            op('+'),
            Term::Operand(Operand::dimension(1.0, Unit::ViewportWidth)),
        ]);
        let mut evaluator = DoubleEvaluator::new(ctx);
        // 100 - 32 + 10
        assert_eq!(args.evaluate(&mut evaluator).map(|val| approx_eq(val, 78.0)), Ok(true));
    }

    #[test]
    fn unknown_operator_is_recorded_not_fatal() {
        let args = CalcArgs::build(&[int(1), op('('), int(2), op('+'), int(3)]);
        assert_eq!(args.evaluate(&mut StringEvaluator), Ok("(1 ( (2 + 3))".to_owned()));

        let mut evaluator = DoubleEvaluator::with_diagnostics(
            |_operand: &Operand| f64::NAN,
            Vec::<CalcDiagnostic>::new(),
        );
        assert_eq!(args.evaluate(&mut evaluator), Ok(0.0));
        assert_eq!(
            evaluator.diagnostics(),
            &vec![CalcDiagnostic::UnknownOperator {
                operator: Operator::OpenParen
            }]
        );
    }

    #[test]
    fn malformed_postfix_is_a_hard_failure() {
        assert_eq!(eval(&[int(1), op('+')]), Err(CalcError::StackUnderflow { position: 1 }));
        assert_eq!(eval(&[]), Err(CalcError::Empty));
        assert_eq!(eval(&[int(1), int(2)]), Err(CalcError::LeftoverOperands { count: 2 }));
    }

    #[test]
    fn invalid_expressions_are_not_evaluated() {
        let args = CalcArgs::build(&[
            Term::Operand(Operand::dimension(3.0, Unit::Pixels)),
            op('+'),
            Term::Operand(Operand::dimension(3.0, Unit::Degrees)),
        ]);
        assert_eq!(args.evaluate(&mut StringEvaluator), Err(CalcError::Invalid));
    }

    #[test]
    fn re_evaluation_is_idempotent() {
        let args = CalcArgs::build(&[int(2), op('*'), op('('), int(3), op('+'), int(4), op(')')]);
        let first = args.evaluate(&mut StringEvaluator);
        let second = args.evaluate(&mut StringEvaluator);
        assert_eq!(first, second);
        assert_eq!(args.evaluate(&mut numbers_only()), args.evaluate(&mut numbers_only()));
    }
}
