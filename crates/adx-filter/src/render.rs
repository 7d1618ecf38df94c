//! Renders a [`FilterNode`] back to RFC 4515 filter text. The inverse of
//! [`crate::parser::parse`]: `parse(render(parse(s)))` reproduces the same
//! tree as `parse(s)`.

use crate::node::FilterNode;

pub fn render(node: &FilterNode) -> String {
    match node {
        FilterNode::Present(attr) => format!("({attr}=*)"),
        FilterNode::Equality(attr, value) => format!("({attr}={})", escape(value)),
        FilterNode::Substring {
            attr,
            initial,
            any,
            r#final,
        } => {
            let mut value = String::new();
            if let Some(i) = initial {
                value.push_str(&escape(i));
            }
            value.push('*');
            for a in any {
                value.push_str(&escape(a));
                value.push('*');
            }
            if let Some(f) = r#final {
                value.push_str(&escape(f));
            }
            format!("({attr}={value})")
        }
        FilterNode::GreaterOrEqual(attr, value) => format!("({attr}>={})", escape(value)),
        FilterNode::LessOrEqual(attr, value) => format!("({attr}<={})", escape(value)),
        FilterNode::ApproxMatch(attr, value) => format!("({attr}~={})", escape(value)),
        FilterNode::Extensible {
            attr,
            matching_rule,
            value,
            dn_attributes,
        } => {
            let mut s = String::new();
            if let Some(a) = attr {
                s.push_str(a);
            }
            if *dn_attributes {
                s.push_str(":dn");
            }
            if let Some(rule) = matching_rule {
                s.push(':');
                s.push_str(rule);
            }
            s.push_str(":=");
            s.push_str(&escape(value));
            format!("({s})")
        }
        FilterNode::And(children) => format!("(&{})", render_children(children)),
        FilterNode::Or(children) => format!("(|{})", render_children(children)),
        FilterNode::Not(child) => format!("(!{})", render(child)),
    }
}

fn render_children(children: &[FilterNode]) -> String {
    children.iter().map(render).collect()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '(' | ')' | '*' | '\\' => out.push_str(&format!("\\{:02x}", ch as u32)),
            _ => out.push(ch),
        }
    }
    out
}
