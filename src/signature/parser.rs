//! Signature DSL parser.
//!
//! ```text
//! signature := ("async")? params "=>" type
//! params    := "(" (param ("," param)*)? ")"
//! param     := ident "?"? ":" type | type "?"?
//! type      := primary ("[]")*
//! primary   := keyword | "[" types "]" | "Promise<" type ">" | "Array<" type ">" | signature
//! ```
//!
//! The parser accepts any parameter ordering; the required-prefix rule is
//! enforced when a signature is compiled.

use super::ast::{FunctionSignature, ParameterType, ParsedType, PrimitiveType};
use crate::errors::{QuackError, Result};
use dashmap::DashMap;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map, map_opt, not, opt, peek, recognize};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;
use once_cell::sync::Lazy;

static PARSED: Lazy<DashMap<String, FunctionSignature>> = Lazy::new(DashMap::new);

/// Texts past this many are parsed on every call instead of being cached.
const MAX_CACHED_SIGNATURES: usize = 1024;

/// Parse signature text into a [`FunctionSignature`].
pub fn parse_signature(text: &str) -> Result<FunctionSignature> {
    match all_consuming(delimited(multispace0, function_type, multispace0))(text) {
        Ok((_, signature)) => Ok(signature),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let offset = text.len() - e.input.len();
            Err(QuackError::parse(text, offset, describe_failure(e.input)))
        }
        Err(nom::Err::Incomplete(_)) => Err(QuackError::parse(
            text,
            text.len(),
            "unexpected end of signature",
        )),
    }
}

/// Cached [`parse_signature`]; contract factories tend to re-parse the same literals.
///
/// The cache holds at most [`MAX_CACHED_SIGNATURES`] texts. Once full, new
/// texts are parsed without being stored, so generated signatures cannot
/// grow it without bound.
pub fn signature_of(text: &str) -> Result<FunctionSignature> {
    if let Some(hit) = PARSED.get(text) {
        return Ok(hit.value().clone());
    }
    let signature = parse_signature(text)?;
    if PARSED.len() < MAX_CACHED_SIGNATURES {
        PARSED.insert(text.to_string(), signature.clone());
    }
    tracing::trace!(signature = %signature, "parsed signature");
    Ok(signature)
}

impl std::str::FromStr for FunctionSignature {
    type Err = QuackError;

    fn from_str(s: &str) -> Result<Self> {
        parse_signature(s)
    }
}

fn describe_failure(rest: &str) -> String {
    match rest.chars().next() {
        None => "unexpected end of signature".to_string(),
        Some(c) => format!("unexpected `{c}`"),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_ident_start), take_while(is_ident_char)))(input)
}

/// `word` not followed by another identifier character.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(peek(take_while1(is_ident_char))))
}

fn symbol<'a>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    delimited(multispace0, char(c), multispace0)
}

fn function_type(input: &str) -> IResult<&str, FunctionSignature> {
    let (input, is_async) = map(opt(terminated(keyword("async"), multispace0)), |a| {
        a.is_some()
    })(input)?;
    let (input, parameters) = parameter_list(input)?;
    let (input, _) = delimited(multispace0, tag("=>"), multispace0)(input)?;
    let (input, returns) = type_expr(input)?;
    Ok((
        input,
        FunctionSignature {
            is_async,
            parameters,
            returns,
        },
    ))
}

fn parameter_list(input: &str) -> IResult<&str, Vec<ParameterType>> {
    delimited(
        pair(char('('), multispace0),
        separated_list0(symbol(','), parameter),
        pair(multispace0, char(')')),
    )(input)
}

fn parameter(input: &str) -> IResult<&str, ParameterType> {
    alt((named_parameter, bare_parameter))(input)
}

fn optional_marker(input: &str) -> IResult<&str, bool> {
    map(opt(preceded(multispace0, char('?'))), |m| m.is_some())(input)
}

fn named_parameter(input: &str) -> IResult<&str, ParameterType> {
    let (input, name) = identifier(input)?;
    let (input, optional) = optional_marker(input)?;
    let (input, _) = symbol(':')(input)?;
    let (input, ty) = type_expr(input)?;
    Ok((
        input,
        ParameterType {
            optional,
            ty,
            name: Some(name.to_string()),
        },
    ))
}

fn bare_parameter(input: &str) -> IResult<&str, ParameterType> {
    let (input, ty) = type_expr(input)?;
    let (input, optional) = optional_marker(input)?;
    Ok((
        input,
        ParameterType {
            optional,
            ty,
            name: None,
        },
    ))
}

fn type_expr(input: &str) -> IResult<&str, ParsedType> {
    let (input, base) = primary_type(input)?;
    let (input, dims) = many0(pair(symbol('['), char(']')))(input)?;
    Ok((input, dims.into_iter().fold(base, |ty, _| ParsedType::array(ty))))
}

fn primary_type(input: &str) -> IResult<&str, ParsedType> {
    alt((
        map_opt(identifier, |word| {
            PrimitiveType::from_keyword(word).map(ParsedType::Primitive)
        }),
        tuple_type,
        map(generic("Promise"), |inner| ParsedType::Promise(Box::new(inner))),
        map(generic("Array"), |element| ParsedType::Array(Box::new(element))),
        map(function_type, ParsedType::function),
    ))(input)
}

fn generic<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, ParsedType> {
    preceded(
        pair(keyword(name), multispace0),
        delimited(
            pair(char('<'), multispace0),
            type_expr,
            pair(multispace0, char('>')),
        ),
    )
}

fn tuple_type(input: &str) -> IResult<&str, ParsedType> {
    map(
        delimited(
            pair(char('['), multispace0),
            separated_list0(symbol(','), type_expr),
            pair(multispace0, char(']')),
        ),
        ParsedType::Tuple,
    )(input)
}
