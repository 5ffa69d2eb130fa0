// Reference and element-list parsers

use super::lexer::{identifier, index_literal, string_literal, ws};
use crate::builder::BindingSpec;
use crate::model::Branch;
use nom::{
    character::complete::char,
    combinator::{map_opt, opt},
    multi::separated_list0,
    sequence::terminated,
    IResult,
};

/// Parse a reference to one element
/// Format: name.index or name.branch.index
pub fn parse_reference(input: &str) -> IResult<&str, BindingSpec> {
    let (input, target) = ws(identifier)(input)?;
    let (input, _) = char('.')(input)?;
    let (input, branch) = opt(terminated(
        map_opt(identifier, |name| Branch::from_name(&name)),
        char('.'),
    ))(input)?;
    let (input, index) = ws(index_literal)(input)?;

    Ok((
        input,
        BindingSpec {
            target,
            branch: branch.unwrap_or_default(),
            index,
        },
    ))
}

/// Parse one element: the bindings of a single position
/// Format: [ref, ref, ...] (trailing comma allowed)
pub fn parse_element(input: &str) -> IResult<&str, Vec<BindingSpec>> {
    bracketed_list(input, parse_reference)
}

/// Parse a list of elements
/// Format: [[ref, ...], [ref, ...], ...]
pub fn parse_element_list(input: &str) -> IResult<&str, Vec<Vec<BindingSpec>>> {
    bracketed_list(input, parse_element)
}

/// Parse a list of literal values
/// Format: ["C", "D", ...]
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<String>> {
    bracketed_list(input, |i| ws(string_literal)(i))
}

fn bracketed_list<'a, O, F>(input: &'a str, item: F) -> IResult<&'a str, Vec<O>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let (input, _) = ws(char('['))(input)?;
    let (input, items) = separated_list0(ws(char(',')), item)(input)?;
    let (input, _) = opt(ws(char(',')))(input)?;
    let (input, _) = ws(char(']'))(input)?;
    Ok((input, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_default_branch() {
        let (rest, spec) = parse_reference("durations.0").unwrap();
        assert_eq!(rest, "");
        assert_eq!(spec, BindingSpec::new("durations", 0));
    }

    #[test]
    fn test_parse_reference_with_branch() {
        let (_, spec) = parse_reference("trans.outputs.0").unwrap();
        assert_eq!(spec, BindingSpec::on("trans", Branch::Outputs, 0));

        let (_, spec) = parse_reference(" phrase.elements.12 ").unwrap();
        assert_eq!(spec, BindingSpec::on("phrase", Branch::Elements, 12));
    }

    #[test]
    fn test_parse_reference_unknown_branch() {
        assert!(parse_reference("trans.sideways.0").is_err());
    }

    #[test]
    fn test_parse_reference_missing_index() {
        assert!(parse_reference("durations").is_err());
        assert!(parse_reference("durations.").is_err());
    }

    #[test]
    fn test_parse_element() {
        let (_, element) = parse_element("[durations.0, scale.2]").unwrap();
        assert_eq!(element, vec![BindingSpec::new("durations", 0), BindingSpec::new("scale", 2)]);
    }

    #[test]
    fn test_parse_element_empty_and_trailing_comma() {
        assert_eq!(parse_element("[]").unwrap().1, vec![]);
        assert_eq!(parse_element("[scale.1,]").unwrap().1.len(), 1);
    }

    #[test]
    fn test_parse_element_list() {
        let (_, rows) = parse_element_list(
            "[\n  [durations.0, scale.2],\n  [phrase.elements.0], # note\n  [trans.outputs.0],\n]",
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec![BindingSpec::on("trans", Branch::Outputs, 0)]);
    }

    #[test]
    fn test_parse_value_list() {
        let (_, values) = parse_value_list(r#"["1/2", "1/4", "1/8"]"#).unwrap();
        assert_eq!(values, vec!["1/2", "1/4", "1/8"]);
    }

    #[test]
    fn test_parse_value_list_unclosed() {
        assert!(parse_value_list(r#"["C", "D""#).is_err());
    }
}
