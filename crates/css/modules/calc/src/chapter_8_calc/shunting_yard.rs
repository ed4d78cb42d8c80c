//! Infix to postfix conversion of `calc()` terms.
//!
//! Classic operator-precedence (shunting-yard) scan with one operator stack.
//! The unit type of the expression is inferred during the same pass.

use super::terms::{Operator, Term};
use super::type_checking::TypeTracker;
use crate::chapter_6_dimensions::UnitType;
use log::debug;
use std::slice;

/// The postfix form of a `calc()` expression together with its inferred type.
///
/// Built once by [`CalcArgs::build`] and read-only afterwards. When
/// [`CalcArgs::is_valid`] is false the scan stopped at the first fault and the
/// postfix sequence is only a prefix of the full result; it must not be
/// evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct CalcArgs {
    postfix: Vec<Term>,
    result_type: UnitType,
    is_integer: bool,
    is_valid: bool,
}

impl CalcArgs {
    /// Convert an infix term sequence to postfix and infer its unit type.
    ///
    /// Malformed input is not an error: it clears [`CalcArgs::is_valid`].
    pub fn build(terms: &[Term]) -> Self {
        let mut postfix = Vec::with_capacity(terms.len());
        let mut stack: Vec<Operator> = Vec::with_capacity(5);
        let mut tracker = TypeTracker::default();

        for (position, term) in terms.iter().enumerate() {
            match term {
                Term::Operand(operand) => {
                    if let Err(mismatch) = tracker.consider(operand) {
                        debug!(
                            "[CALC] type mismatch at term {position}: expected {:?}, found {:?}",
                            mismatch.expected, mismatch.found
                        );
                        return Self::aborted(postfix, tracker);
                    }
                    postfix.push(term.clone());
                }
                Term::Operator(operator) => match operator.precedence() {
                    Some(precedence) => {
                        while let Some(&top) = stack.last() {
                            match top.precedence() {
                                Some(top_precedence) if top_precedence >= precedence => {
                                    postfix.push(Term::Operator(top));
                                    stack.pop();
                                }
                                _ => break,
                            }
                        }
                        stack.push(*operator);
                    }
                    None if *operator == Operator::OpenParen => stack.push(*operator),
                    None => {
                        while let Some(top) = stack.pop() {
                            if top == Operator::OpenParen {
                                break;
                            }
                            postfix.push(Term::Operator(top));
                        }
                    }
                },
                Term::Other(text) => {
                    debug!("[CALC] unexpected term {text:?} at position {position}");
                    return Self::aborted(postfix, tracker);
                }
            }
        }

        while let Some(top) = stack.pop() {
            postfix.push(Term::Operator(top));
        }

        Self {
            postfix,
            result_type: tracker.result_type(),
            is_integer: tracker.is_integer(),
            is_valid: true,
        }
    }

    /// The operator stack is left undrained: the partial output is whatever
    /// had been emitted before the fault.
    fn aborted(postfix: Vec<Term>, tracker: TypeTracker) -> Self {
        Self {
            postfix,
            result_type: tracker.result_type(),
            is_integer: tracker.is_integer(),
            is_valid: false,
        }
    }

    /// Terms in postfix order.
    pub fn terms(&self) -> &[Term] {
        &self.postfix
    }

    pub fn len(&self) -> usize {
        self.postfix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postfix.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Term> {
        self.postfix.iter()
    }

    /// The dimension all operands agree on, `UnitType::None` when every
    /// operand was a bare number.
    pub const fn result_type(&self) -> UnitType {
        self.result_type
    }

    /// True when no bare-number operand was a non-integer `<number>`.
    pub const fn is_integer(&self) -> bool {
        self.is_integer
    }

    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Type of the value the expression produces: the fixed dimension, or
    /// `Integer`/`Number` for an expression made only of numbers.
    pub const fn value_type(&self) -> UnitType {
        match self.result_type {
            UnitType::None if self.is_integer => UnitType::Integer,
            UnitType::None => UnitType::Number,
            fixed => fixed,
        }
    }
}

impl From<&[Term]> for CalcArgs {
    fn from(terms: &[Term]) -> Self {
        Self::build(terms)
    }
}

impl FromIterator<Term> for CalcArgs {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let terms: Vec<Term> = iter.into_iter().collect();
        Self::build(&terms)
    }
}

impl<'args> IntoIterator for &'args CalcArgs {
    type Item = &'args Term;
    type IntoIter = slice::Iter<'args, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
