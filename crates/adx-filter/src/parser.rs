//! RFC 4515 tokenizer and recursive-descent parser.

use crate::error::{FilterError, Result};
use crate::node::FilterNode;

/// Parses a single RFC 4515 filter string into a [`FilterNode`] tree.
pub fn parse(input: &str) -> Result<FilterNode> {
    let bytes = input.as_bytes();
    let mut pos = 0usize;
    let node = parse_filter(bytes, &mut pos)?;
    if pos != bytes.len() {
        return Err(FilterError::UnexpectedChar {
            position: pos,
            found: bytes[pos] as char,
        });
    }
    Ok(node)
}

fn parse_filter(bytes: &[u8], pos: &mut usize) -> Result<FilterNode> {
    expect(bytes, pos, b'(')?;
    let node = parse_filter_contents(bytes, pos)?;
    expect(bytes, pos, b')')?;
    Ok(node)
}

fn expect(bytes: &[u8], pos: &mut usize, want: u8) -> Result<()> {
    match bytes.get(*pos) {
        Some(&b) if b == want => {
            *pos += 1;
            Ok(())
        }
        Some(&b) => Err(FilterError::UnexpectedChar {
            position: *pos,
            found: b as char,
        }),
        None => Err(FilterError::UnbalancedParen { position: *pos }),
    }
}

fn parse_filter_contents(bytes: &[u8], pos: &mut usize) -> Result<FilterNode> {
    match bytes.get(*pos) {
        Some(b'&') => {
            *pos += 1;
            Ok(FilterNode::And(parse_filter_list(bytes, pos)?))
        }
        Some(b'|') => {
            *pos += 1;
            Ok(FilterNode::Or(parse_filter_list(bytes, pos)?))
        }
        Some(b'!') => {
            *pos += 1;
            Ok(FilterNode::Not(Box::new(parse_filter(bytes, pos)?)))
        }
        Some(_) => parse_attr_or_extensible(bytes, pos),
        None => Err(FilterError::UnbalancedParen { position: *pos }),
    }
}

/// Empty `(&)`/`(|)` parse to an empty child list; the evaluator gives them
/// the RFC 4526 TRUE/FALSE identity values.
fn parse_filter_list(bytes: &[u8], pos: &mut usize) -> Result<Vec<FilterNode>> {
    let mut children = Vec::new();
    while bytes.get(*pos) == Some(&b'(') {
        children.push(parse_filter(bytes, pos)?);
    }
    Ok(children)
}

fn read_attr_desc(bytes: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while let Some(&b) = bytes.get(*pos) {
        if matches!(b, b'~' | b'<' | b'>' | b':' | b'=' | b')') {
            break;
        }
        *pos += 1;
    }
    String::from_utf8_lossy(&bytes[start..*pos]).into_owned()
}

fn parse_attr_or_extensible(bytes: &[u8], pos: &mut usize) -> Result<FilterNode> {
    let attr = read_attr_desc(bytes, pos);
    match bytes.get(*pos) {
        Some(b'~') => {
            expect_op(bytes, pos, b"~=")?;
            require_attr(&attr, *pos)?;
            Ok(FilterNode::ApproxMatch(attr, read_value(bytes, pos)?))
        }
        Some(b'>') => {
            expect_op(bytes, pos, b">=")?;
            require_attr(&attr, *pos)?;
            Ok(FilterNode::GreaterOrEqual(attr, read_value(bytes, pos)?))
        }
        Some(b'<') => {
            expect_op(bytes, pos, b"<=")?;
            require_attr(&attr, *pos)?;
            Ok(FilterNode::LessOrEqual(attr, read_value(bytes, pos)?))
        }
        Some(b':') => parse_extensible(bytes, pos, attr),
        Some(b'=') => {
            *pos += 1;
            require_attr(&attr, *pos)?;
            parse_equality_or_substring(bytes, pos, attr)
        }
        Some(&b) => Err(FilterError::UnexpectedChar {
            position: *pos,
            found: b as char,
        }),
        None => Err(FilterError::UnbalancedParen { position: *pos }),
    }
}

fn require_attr(attr: &str, position: usize) -> Result<()> {
    if attr.is_empty() {
        Err(FilterError::EmptyAttribute { position })
    } else {
        Ok(())
    }
}

fn expect_op(bytes: &[u8], pos: &mut usize, op: &[u8]) -> Result<()> {
    if bytes.get(*pos..*pos + op.len()) == Some(op) {
        *pos += op.len();
        Ok(())
    } else {
        Err(FilterError::UnexpectedChar {
            position: *pos,
            found: bytes.get(*pos).map(|&b| b as char).unwrap_or('\0'),
        })
    }
}

/// `attr[:dn][:rule]:=value`, or the same with `attr` omitted.
fn parse_extensible(bytes: &[u8], pos: &mut usize, attr: String) -> Result<FilterNode> {
    let mut dn_attributes = false;
    let mut matching_rule = None;

    loop {
        *pos += 1; // consume the ':' that got us here or that ended the last token
        if bytes.get(*pos) == Some(&b'=') {
            *pos += 1;
            break;
        }
        let tok_start = *pos;
        while matches!(bytes.get(*pos), Some(b) if *b != b':' && *b != b'=') {
            *pos += 1;
        }
        let tok = std::str::from_utf8(&bytes[tok_start..*pos]).unwrap_or("");
        if tok.eq_ignore_ascii_case("dn") {
            dn_attributes = true;
        } else if !tok.is_empty() {
            matching_rule = Some(tok.to_string());
        }
        if bytes.get(*pos) != Some(&b':') {
            return Err(FilterError::UnexpectedChar {
                position: *pos,
                found: bytes.get(*pos).map(|&b| b as char).unwrap_or('\0'),
            });
        }
    }

    let value = read_value(bytes, pos)?;
    Ok(FilterNode::Extensible {
        attr: (!attr.is_empty()).then_some(attr),
        matching_rule,
        value,
        dn_attributes,
    })
}

fn decode_escape(bytes: &[u8], pos: usize) -> Result<(u8, usize)> {
    let hex = bytes
        .get(pos + 1..pos + 3)
        .ok_or(FilterError::InvalidEscape { position: pos })?;
    let s = std::str::from_utf8(hex).map_err(|_| FilterError::InvalidEscape { position: pos })?;
    let byte = u8::from_str_radix(s, 16).map_err(|_| FilterError::InvalidEscape { position: pos })?;
    Ok((byte, pos + 3))
}

/// Reads an assertion value with no `*` splitting (used by comparison
/// filters other than equality/substring).
fn read_value(bytes: &[u8], pos: &mut usize) -> Result<String> {
    let mut buf = Vec::new();
    loop {
        match bytes.get(*pos) {
            None => return Err(FilterError::UnbalancedParen { position: *pos }),
            Some(b')') => break,
            Some(b'\\') => {
                let (byte, new_pos) = decode_escape(bytes, *pos)?;
                buf.push(byte);
                *pos = new_pos;
            }
            Some(&b) => {
                buf.push(b);
                *pos += 1;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads an assertion value split into segments by unescaped `*`. An
/// escaped asterisk (`\2a`) is a literal character and stays inside its
/// segment rather than splitting it.
fn read_assertion_segments(bytes: &[u8], pos: &mut usize) -> Result<Vec<String>> {
    let mut segments: Vec<Vec<u8>> = vec![Vec::new()];
    loop {
        match bytes.get(*pos) {
            None => return Err(FilterError::UnbalancedParen { position: *pos }),
            Some(b')') => break,
            Some(b'*') => {
                *pos += 1;
                segments.push(Vec::new());
            }
            Some(b'\\') => {
                let (byte, new_pos) = decode_escape(bytes, *pos)?;
                segments.last_mut().unwrap().push(byte);
                *pos = new_pos;
            }
            Some(&b) => {
                segments.last_mut().unwrap().push(b);
                *pos += 1;
            }
        }
    }
    Ok(segments
        .into_iter()
        .map(|v| String::from_utf8_lossy(&v).into_owned())
        .collect())
}

fn parse_equality_or_substring(bytes: &[u8], pos: &mut usize, attr: String) -> Result<FilterNode> {
    let mut segments = read_assertion_segments(bytes, pos)?;

    if segments.len() == 1 {
        return Ok(FilterNode::Equality(attr, segments.pop().unwrap()));
    }
    if segments.len() == 2 && segments[0].is_empty() && segments[1].is_empty() {
        return Ok(FilterNode::Present(attr));
    }

    let r#final = segments.pop().unwrap();
    let initial = segments.remove(0);
    let any: Vec<String> = segments.into_iter().filter(|s| !s.is_empty()).collect();

    Ok(FilterNode::Substring {
        attr,
        initial: (!initial.is_empty()).then_some(initial),
        any,
        r#final: (!r#final.is_empty()).then_some(r#final),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_equality() {
        let node = parse("(cn=Administrator)").unwrap();
        assert_eq!(node, FilterNode::Equality("cn".into(), "Administrator".into()));
    }

    #[test]
    fn parses_present_from_bare_wildcard() {
        let node = parse("(mail=*)").unwrap();
        assert_eq!(node, FilterNode::Present("mail".into()));
    }

    #[test]
    fn parses_substring_with_initial_any_final() {
        let node = parse("(cn=a*b*c)").unwrap();
        assert_eq!(
            node,
            FilterNode::Substring {
                attr: "cn".into(),
                initial: Some("a".into()),
                any: vec!["b".into()],
                r#final: Some("c".into()),
            }
        );
    }

    #[test]
    fn parses_and_or_not() {
        let node = parse("(&(cn=a)(|(mail=*)(!(sn=b))))").unwrap();
        assert_eq!(
            node,
            FilterNode::And(vec![
                FilterNode::Equality("cn".into(), "a".into()),
                FilterNode::Or(vec![
                    FilterNode::Present("mail".into()),
                    FilterNode::Not(Box::new(FilterNode::Equality("sn".into(), "b".into()))),
                ]),
            ])
        );
    }

    #[test]
    fn parses_empty_and_or() {
        assert_eq!(parse("(&)").unwrap(), FilterNode::And(vec![]));
        assert_eq!(parse("(|)").unwrap(), FilterNode::Or(vec![]));
    }

    #[test]
    fn decodes_escaped_special_characters() {
        let node = parse(r"(cn=a\28b\29)").unwrap();
        assert_eq!(node, FilterNode::Equality("cn".into(), "a(b)".into()));
    }

    #[test]
    fn escaped_asterisk_does_not_split_value() {
        let node = parse(r"(cn=a\2ab)").unwrap();
        assert_eq!(node, FilterNode::Equality("cn".into(), "a*b".into()));
    }

    #[test]
    fn parses_extensible_with_dn_and_rule() {
        let node = parse("(cn:dn:2.5.13.2:=value)").unwrap();
        assert_eq!(
            node,
            FilterNode::Extensible {
                attr: Some("cn".into()),
                matching_rule: Some("2.5.13.2".into()),
                value: "value".into(),
                dn_attributes: true,
            }
        );
    }

    #[test]
    fn parses_extensible_without_attr() {
        let node = parse("(:dn:2.5.13.2:=value)").unwrap();
        assert_eq!(
            node,
            FilterNode::Extensible {
                attr: None,
                matching_rule: Some("2.5.13.2".into()),
                value: "value".into(),
                dn_attributes: true,
            }
        );
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(matches!(
            parse("(&(objectClass=user)"),
            Err(FilterError::UnbalancedParen { .. })
        ));
    }

    #[test]
    fn rejects_empty_attribute_on_equality() {
        assert!(matches!(
            parse("(=foo)"),
            Err(FilterError::EmptyAttribute { .. })
        ));
    }
}
