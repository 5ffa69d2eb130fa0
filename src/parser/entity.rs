// Entity declaration parsers

use super::ast::{EntityBody, EntityDecl};
use super::lexer::{identifier, keyword, string_literal, ws};
use super::reference::{parse_element_list, parse_value_list};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::opt,
    IResult,
};

/// Parse any entity declaration
pub fn parse_entity(input: &str) -> IResult<&str, EntityDecl> {
    alt((parse_values, parse_sequence, parse_transform))(input)
}

/// Parse a values table
/// Format: values name ["label"] = ["C", "D", ...]
pub fn parse_values(input: &str) -> IResult<&str, EntityDecl> {
    let (input, (name, label)) = parse_head("values")(input)?;
    let (input, values) = parse_value_list(input)?;
    Ok((
        input,
        EntityDecl {
            name,
            label,
            body: EntityBody::Values(values),
        },
    ))
}

/// Parse a sequence
/// Format: sequence name ["label"] = [[ref, ...], ...]
pub fn parse_sequence(input: &str) -> IResult<&str, EntityDecl> {
    let (input, (name, label)) = parse_head("sequence")(input)?;
    let (input, elements) = parse_element_list(input)?;
    Ok((
        input,
        EntityDecl {
            name,
            label,
            body: EntityBody::Sequence(elements),
        },
    ))
}

/// Parse a transform
/// Format: transform name ["label"] = function([[ref, ...], ...])
pub fn parse_transform(input: &str) -> IResult<&str, EntityDecl> {
    let (input, (name, label)) = parse_head("transform")(input)?;
    let (input, function) = ws(identifier)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, inputs) = opt(parse_element_list)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((
        input,
        EntityDecl {
            name,
            label,
            body: EntityBody::Transform {
                function,
                inputs: inputs.unwrap_or_default(),
            },
        },
    ))
}

/// keyword name ["label"] =
fn parse_head<'a>(kind: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, (String, Option<String>)> {
    move |input: &'a str| {
        let (input, _) = ws(keyword(kind))(input)?;
        let (input, name) = ws(identifier)(input)?;
        let (input, label) = opt(ws(string_literal))(input)?;
        let (input, _) = ws(char('='))(input)?;
        Ok((input, (name, label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BindingSpec;
    use crate::model::Branch;

    #[test]
    fn test_parse_values() {
        let (_, decl) = parse_entity(r#"values durations "DURATIONS" = ["1/2", "1/4", "1/8"]"#).unwrap();
        assert_eq!(decl.name, "durations");
        assert_eq!(decl.label(), "DURATIONS");
        assert_eq!(
            decl.body,
            EntityBody::Values(vec!["1/2".to_string(), "1/4".to_string(), "1/8".to_string()])
        );
    }

    #[test]
    fn test_parse_values_without_label() {
        let (_, decl) = parse_entity(r#"values scale = ["C"]"#).unwrap();
        assert_eq!(decl.label, None);
        assert_eq!(decl.label(), "scale");
    }

    #[test]
    fn test_parse_sequence() {
        let (_, decl) = parse_entity("sequence phrase = [[durations.2, scale.1]]").unwrap();
        assert_eq!(
            decl.body,
            EntityBody::Sequence(vec![vec![BindingSpec::new("durations", 2), BindingSpec::new("scale", 1)]])
        );
    }

    #[test]
    fn test_parse_transform() {
        let (_, decl) = parse_entity(
            r#"transform trans "Reverse inputs" = reverse([[durations.0], [durations.1, scale.inputs.1]])"#,
        )
        .unwrap();
        match decl.body {
            EntityBody::Transform { function, inputs } => {
                assert_eq!(function, "reverse");
                assert_eq!(inputs.len(), 2);
                assert_eq!(inputs[1][1], BindingSpec::on("scale", Branch::Inputs, 1));
            }
            _ => panic!("Expected Transform"),
        }
    }

    #[test]
    fn test_parse_transform_without_inputs() {
        let (_, decl) = parse_entity("transform t = identity()").unwrap();
        assert_eq!(
            decl.body,
            EntityBody::Transform {
                function: "identity".to_string(),
                inputs: vec![]
            }
        );
    }

    #[test]
    fn test_parse_entity_unknown_keyword() {
        assert!(parse_entity(r#"table scale = ["C"]"#).is_err());
    }

    #[test]
    fn test_parse_entity_missing_equals() {
        assert!(parse_entity(r#"values scale ["C"]"#).is_err());
    }
}
