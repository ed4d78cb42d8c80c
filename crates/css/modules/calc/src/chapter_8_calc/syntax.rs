//! §8.1.1 Syntax
//! Spec: <https://www.w3.org/TR/css-values-3/#calc-syntax>
//!
//! Turns the tokens of a `calc()` body into [`Term`]s. Grammar checks beyond
//! token classification are left to [`CalcArgs::build`].

use super::shunting_yard::CalcArgs;
use super::terms::{Operand, Operator, Term};
use crate::ParseError;
use crate::chapter_6_dimensions::Unit;
use cssparser::{ParseErrorKind, Parser, ParserInput, ToCss as _, Token};

/// Parse a `calc( ... )` function into its postfix form.
///
/// # Errors
/// Returns `ParseError::NotCalcFunction` for any other function token and
/// `ParseError::UnexpectedToken` when the next token is not a function or the
/// body contains bad strings or URLs.
pub fn parse_calc(input: &mut Parser) -> Result<CalcArgs, ParseError> {
    let token = input
        .next()
        .map_err(|_| ParseError::UnexpectedToken)?
        .clone();
    match token {
        Token::Function(name) if name.eq_ignore_ascii_case("calc") => {}
        Token::Function(_) => return Err(ParseError::NotCalcFunction),
        _ => return Err(ParseError::UnexpectedToken),
    }
    let terms = input
        .parse_nested_block::<_, _, ParseError>(|nested| {
            parse_calc_terms(nested).map_err(|err| nested.new_custom_error(err))
        })
        .map_err(unwrap_nested)?;
    Ok(CalcArgs::build(&terms))
}

/// Classify the remaining tokens of `input` (a `calc()` body) as terms.
///
/// Parenthesis blocks and nested `calc()` become `(` ... `)`. Tokens with no
/// arithmetic meaning are kept as [`Term::Other`] so that the build step can
/// reject the expression.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` on bad strings or URLs.
pub fn parse_calc_terms(input: &mut Parser) -> Result<Vec<Term>, ParseError> {
    let mut terms = Vec::new();
    collect_terms(input, &mut terms)?;
    Ok(terms)
}

fn collect_terms(input: &mut Parser, terms: &mut Vec<Term>) -> Result<(), ParseError> {
    loop {
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };
        match token {
            Token::Number {
                value, int_value, ..
            } => terms.push(Term::Operand(
                int_value.map_or_else(|| Operand::number(value), Operand::integer),
            )),
            percentage @ Token::Percentage { unit_value, .. } => {
                terms.push(Term::Operand(Operand::percentage(percent_value(
                    &percentage,
                    unit_value,
                ))));
            }
            Token::Dimension { value, unit, .. } => {
                terms.push(Term::Operand(Operand::dimension(value, Unit::parse(&unit))));
            }
            Token::Delim(symbol) => terms.push(
                Operator::from_symbol(symbol)
                    .map_or_else(|| Term::Other(symbol.to_string()), Term::Operator),
            ),
            Token::ParenthesisBlock => collect_group(input, terms)?,
            Token::Function(ref name) if name.eq_ignore_ascii_case("calc") => {
                collect_group(input, terms)?;
            }
            Token::BadUrl(_) | Token::BadString(_) => return Err(ParseError::UnexpectedToken),
            other => terms.push(Term::Other(other.to_css_string())),
        }
    }
}

/// Percent value as written by the author.
///
/// cssparser keeps percentages as an f32 fraction; scaling that back by 100
/// leaves rounding noise (`14.3%` becomes `14.300001`). Its own serialization
/// rounds to f32 precision, so the value is read back from that text.
fn percent_value(percentage: &Token, unit_value: f32) -> f32 {
    percentage
        .to_css_string()
        .trim_end_matches('%')
        .parse()
        .unwrap_or(unit_value * 100.0)
}

/// Emit the block the parser is positioned on, wrapped in parentheses.
fn collect_group(input: &mut Parser, terms: &mut Vec<Term>) -> Result<(), ParseError> {
    terms.push(Term::Operator(Operator::OpenParen));
    input
        .parse_nested_block::<_, _, ParseError>(|nested| {
            collect_terms(nested, terms).map_err(|err| nested.new_custom_error(err))
        })
        .map_err(unwrap_nested)?;
    terms.push(Term::Operator(Operator::CloseParen));
    Ok(())
}

fn unwrap_nested(error: cssparser::ParseError<'_, ParseError>) -> ParseError {
    match error.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(_) => ParseError::UnexpectedToken,
    }
}

impl CalcArgs {
    /// Parse CSS text of the form `calc(...)`.
    ///
    /// [`CalcArgs::is_valid`] on the result only covers term shapes and unit
    /// types, not operator/operand arity: `calc(1px + )` and `calc(2-1)` (where
    /// `-1` is a signed number) both build as valid and fail at evaluation.
    ///
    /// # Errors
    /// Same as [`parse_calc`], plus `ParseError::UnexpectedToken` when
    /// anything other than whitespace follows the closing parenthesis.
    pub fn from_css(text: &str) -> Result<Self, ParseError> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let args = parse_calc(&mut parser)?;
        parser
            .expect_exhausted()
            .map_err(|_| ParseError::UnexpectedToken)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter_6_dimensions::UnitType;
    use crate::chapter_8_calc::evaluation::{CalcError, StringEvaluator};

    fn terms_of(body: &str) -> Result<Vec<String>, ParseError> {
        let mut input = ParserInput::new(body);
        let mut parser = Parser::new(&mut input);
        let terms = parse_calc_terms(&mut parser)?;
        Ok(terms.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn classifies_numeric_tokens() {
        assert_eq!(
            terms_of("3 + 2.5 * 50% - 4px").map(|list| list.join(" ")),
            Ok("3 + 2.5 * 50% - 4px".to_owned())
        );
    }

    #[test]
    fn parenthesis_blocks_become_operators() {
        let terms = terms_of("(1 + calc(2 * 3)) / 4");
        assert_eq!(
            terms.map(|list| list.join(" ")),
            Ok("( 1 + ( 2 * 3 ) ) / 4".to_owned())
        );
    }

    #[test]
    fn foreign_tokens_are_kept() {
        assert_eq!(terms_of("1 + auto").map(|list| list.join(" ")), Ok("1 + auto".to_owned()));
    }

    #[test]
    fn integer_tokens_stay_integers() {
        let args = CalcArgs::from_css("calc(2 + 3)");
        assert_eq!(args.as_ref().map(CalcArgs::is_integer), Ok(true));
        let args = CalcArgs::from_css("calc(2.0 + 3)");
        assert_eq!(args.as_ref().map(CalcArgs::is_integer), Ok(false));
    }

    #[test]
    fn from_css_builds_postfix() {
        let args = CalcArgs::from_css("calc(100% - 2 * 1em)");
        assert_eq!(args.as_ref().map(CalcArgs::is_valid), Ok(true));
        assert_eq!(args.as_ref().map(CalcArgs::result_type), Ok(UnitType::Length));
        assert_eq!(
            args.map(|built| built.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")),
            Ok("100% 2 1em * -".to_owned())
        );
    }

    #[test]
    fn calc_function_is_required() {
        assert_eq!(CalcArgs::from_css("min(1px, 2px)"), Err(ParseError::NotCalcFunction));
        assert_eq!(CalcArgs::from_css("3px"), Err(ParseError::UnexpectedToken));
        assert_eq!(CalcArgs::from_css("calc(1px) 2px"), Err(ParseError::UnexpectedToken));
    }

    #[test]
    fn percentages_render_as_written() {
        let args = CalcArgs::from_css("calc(14.3% + 1px)");
        assert_eq!(
            args.map(|built| built.evaluate(&mut StringEvaluator)),
            Ok(Ok("(14.3% + 1px)".to_owned()))
        );
        assert_eq!(
            terms_of("33.3% 0.1% 12.5%").map(|list| list.join(" ")),
            Ok("33.3% 0.1% 12.5%".to_owned())
        );
    }

    #[test]
    fn arity_errors_surface_at_evaluation() {
        let dangling = CalcArgs::from_css("calc(1px + )");
        assert_eq!(dangling.as_ref().map(CalcArgs::is_valid), Ok(true));
        assert_eq!(
            dangling.map(|built| built.evaluate(&mut StringEvaluator)),
            Ok(Err(CalcError::StackUnderflow { position: 1 }))
        );

        let signed = CalcArgs::from_css("calc(2-1)");
        assert_eq!(signed.as_ref().map(CalcArgs::is_valid), Ok(true));
        assert_eq!(
            signed.map(|built| built.evaluate(&mut StringEvaluator)),
            Ok(Err(CalcError::LeftoverOperands { count: 2 }))
        );
    }

    #[test]
    fn mismatched_units_parse_but_are_invalid() {
        let args = CalcArgs::from_css("CALC(3px + 3deg)");
        assert_eq!(args.as_ref().map(CalcArgs::is_valid), Ok(false));
    }
}
