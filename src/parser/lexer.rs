// Lexer utilities for the follow description language

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, multispace1, not_line_ending},
    combinator::{map_res, recognize, value},
    multi::many0,
    sequence::{delimited, pair},
    IResult,
};

/// Skip whitespace and `#` line comments
pub fn blank(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, recognize(pair(char('#'), not_line_ending))))),
    )(input)
}

/// Parse and consume surrounding whitespace and comments
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(blank, inner, blank)
}

/// Parse an identifier (entity name, branch, function name)
/// Format: [a-zA-Z_][a-zA-Z0-9_]*
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, ident) = recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;

    // Validate first character
    if let Some(first) = ident.chars().next() {
        if !first.is_alphabetic() && first != '_' {
            return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha)));
        }
    }

    Ok((rest, ident.to_string()))
}

/// Match a whole-word keyword, so `values` does not match the front of `valuesx`
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (rest, ident) = recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;
        if ident == word {
            Ok((rest, ident))
        } else {
            Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))
        }
    }
}

/// Parse a string literal
/// Format: "..."
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, content) = delimited(
        char('"'),
        take_while(|c: char| c != '"'),
        char('"'),
    )(input)?;

    Ok((input, content.to_string()))
}

/// Parse a non-negative position
pub fn index_literal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}
