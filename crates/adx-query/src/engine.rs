//! The query orchestrator: ties [`SnapshotReader`] to [`FilterEvaluator`],
//! applies projection and limit, and tracks run counters.

use std::time::{Duration, Instant};

use adx_codec::{CodecError, ObjectIter, Object, SnapshotReader};
use adx_dtyp::Value;
use adx_filter::{FilterEvaluator, FilterNode};
use adx_schema::{AttributeId, Schema};

use crate::error::Result;

/// A directory object after filter matching and projection: a resolved DN
/// plus the rendered values of the attributes the caller asked to see (or
/// every attribute present, when no projection was requested).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedObject {
    pub dn: String,
    pub attributes: Vec<(String, Vec<String>)>,
}

impl ProjectedObject {
    /// Case-insensitive lookup by attribute name, matching LDAP attribute
    /// description comparison rules.
    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

/// Run counters surfaced to the caller after (or during) iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub objects_scanned: u64,
    pub objects_matched: u64,
    pub decode_errors: u64,
    pub elapsed: Duration,
}

/// Stateless entry point: parses the filter once and hands back a lazy,
/// pull-based sequence of matches.
pub struct QueryEngine;

impl QueryEngine {
    /// Parses `filter_text` and prepares a query run over `reader`.
    ///
    /// The filter is parsed before any object is read, so a syntax error is
    /// returned immediately with no iteration having occurred.
    pub fn run<'s>(
        reader: &'s mut SnapshotReader,
        filter_text: &str,
        projection: Option<&[String]>,
        limit: Option<usize>,
        case_insensitive: bool,
    ) -> Result<QueryRun<'s>> {
        let filter = adx_filter::parse(filter_text)?;
        let schema = reader.schema().clone();

        let projection = projection.map(|names| {
            names
                .iter()
                .filter_map(|name| match schema.attribute_by_name(name) {
                    Some(attr) => Some(attr.id),
                    None => {
                        log::warn!("projected attribute '{name}' is not present in the snapshot schema");
                        None
                    }
                })
                .collect::<Vec<_>>()
        });

        Ok(QueryRun {
            iter: reader.objects(),
            schema,
            filter,
            projection,
            remaining: limit,
            case_insensitive,
            objects_scanned: 0,
            objects_matched: 0,
            started: Instant::now(),
        })
    }
}

/// A lazy, single-pass query result sequence. Implements [`Iterator`];
/// dropping it part-way through is safe and releases the underlying
/// snapshot reader.
pub struct QueryRun<'s> {
    iter: ObjectIter<'s>,
    schema: Schema,
    filter: FilterNode,
    projection: Option<Vec<AttributeId>>,
    remaining: Option<usize>,
    case_insensitive: bool,
    objects_scanned: u64,
    objects_matched: u64,
    started: Instant,
}

impl QueryRun<'_> {
    /// Snapshot of the run's counters as of the most recent call to
    /// [`Iterator::next`].
    pub fn stats(&self) -> Stats {
        Stats {
            objects_scanned: self.objects_scanned,
            objects_matched: self.objects_matched,
            decode_errors: self.iter.decode_warnings(),
            elapsed: self.started.elapsed(),
        }
    }

    /// The sticky fatal decode error, if the underlying reader aborted
    /// iteration early.
    pub fn error(&self) -> Option<&CodecError> {
        self.iter.error()
    }
}

impl Iterator for QueryRun<'_> {
    type Item = ProjectedObject;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }

        let evaluator = FilterEvaluator::new(&self.schema, self.case_insensitive);
        for object in self.iter.by_ref() {
            self.objects_scanned += 1;
            if evaluator.evaluate(&self.filter, &object).is_match() {
                self.objects_matched += 1;
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                return Some(project(&self.schema, &object, self.projection.as_deref()));
            }
        }
        None
    }
}

fn project(schema: &Schema, object: &Object, projection: Option<&[AttributeId]>) -> ProjectedObject {
    let dn = object.distinguished_name(schema).unwrap_or_else(|e| {
        log::warn!("failed to resolve object DN: {e}");
        String::new()
    });

    let attributes = match projection {
        Some(ids) => ids
            .iter()
            .filter_map(|&id| {
                let values = object.values(id)?;
                let name = schema.attribute_by_id(id)?.name.clone();
                Some((name, render_all(values)))
            })
            .collect(),
        None => object
            .attribute_ids()
            .filter_map(|id| {
                let attr = schema.attribute_by_id(id)?;
                let values = object.values(id).unwrap_or(&[]);
                Some((attr.name.clone(), render_all(values)))
            })
            .collect(),
    };

    ProjectedObject { dn, attributes }
}

fn render_all(values: &[Value]) -> Vec<String> {
    values.iter().map(Value::render).collect()
}
