//! Three-valued filter evaluation against a decoded [`Object`], per RFC
//! 4511 §4.5.1.7.

use adx_codec::Object;
use adx_dtyp::{Guid, Sid, SyntaxCode, Value};
use adx_schema::{AttributeDef, Schema};

use crate::node::FilterNode;

/// RFC 4511's three truth values. UNDEFINED must propagate through the
/// AND/OR/NOT algebra rather than collapsing to FALSE early — collapsing it
/// silently breaks `NOT` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    True,
    False,
    Undefined,
}

impl Match {
    pub fn not3(self) -> Match {
        match self {
            Match::True => Match::False,
            Match::False => Match::True,
            Match::Undefined => Match::Undefined,
        }
    }

    /// Collapses to the boolean a query cares about: only TRUE retains an
    /// object.
    pub fn is_match(self) -> bool {
        matches!(self, Match::True)
    }
}

#[derive(Clone, Copy)]
enum OrderOp {
    GreaterOrEqual,
    LessOrEqual,
}

/// Evaluates filter trees against objects from one snapshot's schema.
pub struct FilterEvaluator<'s> {
    schema: &'s Schema,
    case_insensitive: bool,
}

impl<'s> FilterEvaluator<'s> {
    pub fn new(schema: &'s Schema, case_insensitive: bool) -> Self {
        FilterEvaluator {
            schema,
            case_insensitive,
        }
    }

    pub fn evaluate(&self, node: &FilterNode, object: &Object) -> Match {
        match node {
            FilterNode::Present(attr) => self.eval_present(attr, object),
            FilterNode::Equality(attr, value) => self.eval_equality(attr, value, object),
            FilterNode::Substring {
                attr,
                initial,
                any,
                r#final,
            } => self.eval_substring(attr, initial.as_deref(), any, r#final.as_deref(), object),
            FilterNode::GreaterOrEqual(attr, value) => {
                self.eval_ordering(attr, value, object, OrderOp::GreaterOrEqual)
            }
            FilterNode::LessOrEqual(attr, value) => {
                self.eval_ordering(attr, value, object, OrderOp::LessOrEqual)
            }
            // Treated as equality: see the open design question on phonetic
            // approximate match.
            FilterNode::ApproxMatch(attr, value) => self.eval_equality(attr, value, object),
            FilterNode::Extensible {
                attr,
                matching_rule,
                value,
                dn_attributes: _,
            } => self.eval_extensible(attr.as_deref(), matching_rule.as_deref(), value, object),
            FilterNode::Not(child) => self.evaluate(child, object).not3(),
            FilterNode::And(children) => self.eval_and(children, object),
            FilterNode::Or(children) => self.eval_or(children, object),
        }
    }

    fn eval_and(&self, children: &[FilterNode], object: &Object) -> Match {
        if children.is_empty() {
            return Match::True; // RFC 4526
        }
        let mut saw_undefined = false;
        for child in children {
            match self.evaluate(child, object) {
                Match::False => return Match::False,
                Match::Undefined => saw_undefined = true,
                Match::True => {}
            }
        }
        if saw_undefined { Match::Undefined } else { Match::True }
    }

    fn eval_or(&self, children: &[FilterNode], object: &Object) -> Match {
        if children.is_empty() {
            return Match::False; // RFC 4526
        }
        let mut saw_undefined = false;
        for child in children {
            match self.evaluate(child, object) {
                Match::True => return Match::True,
                Match::Undefined => saw_undefined = true,
                Match::False => {}
            }
        }
        if saw_undefined { Match::Undefined } else { Match::False }
    }

    fn eval_present(&self, attr: &str, object: &Object) -> Match {
        let present = self
            .schema
            .attribute_by_name(attr)
            .and_then(|a| object.values(a.id))
            .is_some_and(|values| !values.is_empty());
        if present { Match::True } else { Match::False }
    }

    fn resolve<'o>(&self, attr: &str, object: &'o Object) -> Option<(&'s AttributeDef, &'o [Value])> {
        let attr = self.schema.attribute_by_name(attr)?;
        let values = object.values(attr.id)?;
        Some((attr, values))
    }

    fn fold<'a>(&self, s: &'a str) -> std::borrow::Cow<'a, str> {
        if self.case_insensitive {
            std::borrow::Cow::Owned(s.to_ascii_lowercase())
        } else {
            std::borrow::Cow::Borrowed(s)
        }
    }

    fn eval_equality(&self, attr_name: &str, raw: &str, object: &Object) -> Match {
        let Some((attr, values)) = self.resolve(attr_name, object) else {
            return Match::Undefined;
        };
        self.values_equal(attr, raw, values)
    }

    fn values_equal(&self, attr: &AttributeDef, raw: &str, values: &[Value]) -> Match {
        match attr.syntax {
            SyntaxCode::String | SyntaxCode::Dn => {
                let candidate = if attr.syntax.is_dn() {
                    canonicalize_dn(raw)
                } else {
                    raw.to_string()
                };
                let found = values.iter().any(|v| {
                    let text = v.as_str().unwrap_or_default();
                    if attr.syntax.is_dn() {
                        canonicalize_dn(text) == candidate
                    } else {
                        self.fold(text) == self.fold(&candidate)
                    }
                });
                bool_match(found)
            }
            SyntaxCode::Integer => match raw.parse::<i64>() {
                Ok(want) => bool_match(values.iter().any(|v| v.as_integer() == Some(want))),
                Err(_) => Match::Undefined,
            },
            SyntaxCode::Boolean => {
                let want = if raw.eq_ignore_ascii_case("true") {
                    true
                } else if raw.eq_ignore_ascii_case("false") {
                    false
                } else {
                    return Match::Undefined;
                };
                bool_match(values.iter().any(|v| matches!(v, Value::Boolean(b) if *b == want)))
            }
            SyntaxCode::Guid => match raw.parse::<Guid>() {
                Ok(want) => bool_match(values.iter().any(|v| matches!(v, Value::Guid(g) if *g == want))),
                Err(_) => Match::Undefined,
            },
            SyntaxCode::Sid => match raw.parse::<Sid>() {
                Ok(want) => bool_match(values.iter().any(|v| matches!(v, Value::Sid(s) if *s == want))),
                Err(_) => Match::Undefined,
            },
            SyntaxCode::FileTime
            | SyntaxCode::OctetString
            | SyntaxCode::SecurityDescriptor
            | SyntaxCode::OtherBinary => {
                let want = self.fold(raw);
                bool_match(values.iter().any(|v| self.fold(&v.render()) == want))
            }
        }
    }

    fn eval_substring(
        &self,
        attr_name: &str,
        initial: Option<&str>,
        any: &[String],
        r#final: Option<&str>,
        object: &Object,
    ) -> Match {
        let Some((attr, values)) = self.resolve(attr_name, object) else {
            return Match::Undefined;
        };
        if !attr.syntax.is_string_like() {
            return Match::Undefined;
        }
        let found = values.iter().any(|v| {
            let text = v.as_str().unwrap_or_default();
            self.substring_match(text, initial, any, r#final)
        });
        bool_match(found)
    }

    fn substring_match(&self, text: &str, initial: Option<&str>, any: &[String], r#final: Option<&str>) -> bool {
        let text = self.fold(text).into_owned();
        let mut rest = text.as_str();

        if let Some(init) = initial {
            let init = self.fold(init);
            if !rest.starts_with(init.as_ref()) {
                return false;
            }
            rest = &rest[init.len()..];
        }
        for piece in any {
            let piece = self.fold(piece);
            match rest.find(piece.as_ref()) {
                Some(idx) => rest = &rest[idx + piece.len()..],
                None => return false,
            }
        }
        if let Some(fin) = r#final {
            let fin = self.fold(fin);
            if !rest.ends_with(fin.as_ref()) {
                return false;
            }
        }
        true
    }

    fn eval_ordering(&self, attr_name: &str, raw: &str, object: &Object, op: OrderOp) -> Match {
        let Some((attr, values)) = self.resolve(attr_name, object) else {
            return Match::Undefined;
        };
        if attr.syntax == SyntaxCode::Integer {
            let Ok(want) = raw.parse::<i64>() else {
                return Match::Undefined;
            };
            let found = values.iter().filter_map(Value::as_integer).any(|n| match op {
                OrderOp::GreaterOrEqual => n >= want,
                OrderOp::LessOrEqual => n <= want,
            });
            return bool_match(found);
        }
        let found = values.iter().any(|v| {
            let rendered = v.render();
            match op {
                OrderOp::GreaterOrEqual => rendered.as_str() >= raw,
                OrderOp::LessOrEqual => rendered.as_str() <= raw,
            }
        });
        bool_match(found)
    }

    fn eval_extensible(
        &self,
        attr: Option<&str>,
        matching_rule: Option<&str>,
        value: &str,
        object: &Object,
    ) -> Match {
        if matching_rule.is_some() {
            // No named matching rules are implemented; an unrecognized
            // rule always yields UNDEFINED.
            return Match::Undefined;
        }
        match attr {
            Some(name) => self.eval_equality(name, value, object),
            None => {
                let mut saw_undefined = false;
                for attr in self.schema.attributes() {
                    match self.eval_equality(&attr.name, value, object) {
                        Match::True => return Match::True,
                        Match::Undefined => saw_undefined = true,
                        Match::False => {}
                    }
                }
                if saw_undefined { Match::Undefined } else { Match::False }
            }
        }
    }
}

fn bool_match(found: bool) -> Match {
    if found { Match::True } else { Match::False }
}

/// "trim whitespace around commas, ASCII-fold attribute type names, leave
/// attribute values as-is." Does not attempt to unescape RFC 4514 escaped
/// commas within a value; a DN that relies on those is compared as-is.
fn canonicalize_dn(dn: &str) -> String {
    dn.split(',')
        .map(|part| {
            let part = part.trim();
            match part.find('=') {
                Some(eq) => {
                    let (ty, value) = part.split_at(eq);
                    format!("{}{}", ty.trim().to_ascii_lowercase(), value)
                }
                None => part.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use adx_schema::PrefixTable;
    use std::collections::BTreeMap;

    fn schema() -> Schema {
        Schema::build(
            vec![
                AttributeDef::new(0, "cn", SyntaxCode::String, true),
                AttributeDef::new(1, "objectClass", SyntaxCode::String, false),
                AttributeDef::new(2, "company", SyntaxCode::String, true),
                AttributeDef::new(3, "member", SyntaxCode::Dn, false),
            ],
            vec![],
            PrefixTable::new(vec![String::new()]),
        )
    }

    fn object(attrs: Vec<(u32, Vec<Value>)>) -> Object {
        let mut map = BTreeMap::new();
        for (id, values) in attrs {
            map.insert(id, values);
        }
        Object::new(0, "cn=test".into(), map)
    }

    #[test]
    fn not_of_undefined_is_undefined() {
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let obj = object(vec![]);
        let filter = FilterNode::Not(Box::new(FilterNode::Equality("cn".into(), "x".into())));
        assert_eq!(evaluator.evaluate(&filter, &obj), Match::Undefined);
    }

    #[test]
    fn de_morgan_holds_under_three_valued_semantics() {
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let obj = object(vec![(1, vec![Value::String("user".into())])]);

        let a = FilterNode::Equality("cn".into(), "x".into()); // undefined: cn absent
        let b = FilterNode::Equality("objectClass".into(), "user".into()); // true

        let not_and = FilterNode::Not(Box::new(FilterNode::And(vec![a.clone(), b.clone()])));
        let or_nots = FilterNode::Or(vec![
            FilterNode::Not(Box::new(a)),
            FilterNode::Not(Box::new(b)),
        ]);
        assert_eq!(evaluator.evaluate(&not_and, &obj), evaluator.evaluate(&or_nots, &obj));
    }

    #[test]
    fn empty_and_matches_everything_empty_or_matches_nothing() {
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let obj = object(vec![]);
        assert_eq!(evaluator.evaluate(&FilterNode::And(vec![]), &obj), Match::True);
        assert_eq!(evaluator.evaluate(&FilterNode::Or(vec![]), &obj), Match::False);
    }

    #[test]
    fn presence_treats_absence_as_false_not_undefined() {
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let obj = object(vec![]);
        assert_eq!(evaluator.evaluate(&FilterNode::Present("cn".into()), &obj), Match::False);
    }

    #[test]
    fn case_folding_flag_controls_string_equality() {
        let schema = schema();
        let obj = object(vec![(0, vec![Value::String("Administrator".into())])]);

        let ci = FilterEvaluator::new(&schema, true);
        assert_eq!(
            ci.evaluate(&FilterNode::Equality("cn".into(), "ADMINISTRATOR".into()), &obj),
            Match::True
        );

        let cs = FilterEvaluator::new(&schema, false);
        assert_eq!(
            cs.evaluate(&FilterNode::Equality("cn".into(), "ADMINISTRATOR".into()), &obj),
            Match::False
        );
    }

    #[test]
    fn not_company_excludes_absent_attribute_per_three_valued_algebra() {
        // (!(company=AcmeCorp)): company absent => inner UNDEFINED => NOT UNDEFINED => non-match.
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let absent = object(vec![]);
        let filter = FilterNode::Not(Box::new(FilterNode::Equality("company".into(), "AcmeCorp".into())));
        assert_eq!(evaluator.evaluate(&filter, &absent).is_match(), false);

        let other_value = object(vec![(2, vec![Value::String("OtherCorp".into())])]);
        assert_eq!(evaluator.evaluate(&filter, &other_value), Match::True);
    }

    #[test]
    fn substring_against_dn_attribute_is_undefined() {
        let schema = schema();
        let evaluator = FilterEvaluator::new(&schema, true);
        let obj = object(vec![(3, vec![Value::String("CN=Alice,DC=corp,DC=local".into())])]);
        let filter = FilterNode::Substring {
            attr: "member".into(),
            initial: Some("CN=Alice".into()),
            any: vec![],
            r#final: None,
        };
        assert_eq!(evaluator.evaluate(&filter, &obj), Match::Undefined);
    }
}
