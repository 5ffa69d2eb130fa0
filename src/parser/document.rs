// Document parser for the follow description language

use super::ast::Document;
use super::entity::parse_entity;
use super::lexer::{blank, ws};
use nom::{combinator::eof, multi::many0, IResult};

/// Parse a complete description
/// Format: zero or more entity declarations, comments and blank lines between
pub fn parse_document(input: &str) -> IResult<&str, Document> {
    let (input, _) = blank(input)?;
    let (input, entities) = many0(parse_entity)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, Document { entities }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::EntityBody;

    const FEASIBILITY: &str = r#"
# durations and pitches
values durations "DURATIONS" = ["1/2", "1/4", "1/8"]
values scale "C Major" = ["C", "D", "E", "F", "G", "A", "B"]

sequence main "The 'Main' music" = [
    [durations.0, scale.2],
    [phrase.elements.0],
    [trans.outputs.0],
]
sequence phrase = [[durations.2, scale.1]]
transform trans "Reverse inputs" = reverse([
    [durations.0, scale.0],
    [durations.1, scale.1],
    [durations.2, scale.2],
])
"#;

    #[test]
    fn test_parse_document() {
        let (_, doc) = parse_document(FEASIBILITY).unwrap();
        let names: Vec<&str> = doc.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["durations", "scale", "main", "phrase", "trans"]);
        assert!(matches!(doc.entities[4].body, EntityBody::Transform { .. }));
    }

    #[test]
    fn test_parse_empty_document() {
        let (_, doc) = parse_document("").unwrap();
        assert!(doc.entities.is_empty());

        let (_, doc) = parse_document("  # only a comment\n").unwrap();
        assert!(doc.entities.is_empty());
    }

    #[test]
    fn test_parse_document_trailing_garbage() {
        assert!(parse_document(r#"values scale = ["C"] oops"#).is_err());
    }

    #[test]
    fn test_parse_document_broken_declaration() {
        assert!(parse_document("sequence main = [[durations.0]").is_err());
    }
}
