//! Environment variable binding.
//!
//! A variable name is the prefix followed by the upper-cased, `_`-joined path
//! of YAML keys from the root to a leaf:
//!
//! - `REGWATCH_WATCH_WORKERS=20`
//! - `REGWATCH_REGOPTS_0_NAME=docker.io` (list index after the list key)
//! - `REGWATCH_NOTIF_WEBHOOK_HEADERS_CONTENT-TYPE=text/plain` (everything after
//!   the map key is the literal map key)
//! - `REGWATCH_PROVIDERS_DOCKER=true` (enables a section without setting any
//!   of its fields)
//!
//! Binding never reads the live process environment; callers hand in an
//! [`Environ`] snapshot.

use super::coerce::{coerce, parse_bool};
use super::merge::deep_merge;
use super::schema::{self, Field, Kind, Node};
use super::types::Config;
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Prefix shared by every recognized variable.
pub const ENV_PREFIX: &str = "REGWATCH_";

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    vars: BTreeMap<String, String>,
}

impl Environ {
    /// Snapshot the current process environment. Variables whose name or
    /// value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Variables starting with `prefix`, sorted by name.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.vars
            .iter()
            .filter(move |(name, _)| name.starts_with(prefix))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environ {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// One step into the document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Key(String),
    /// Index as written in the variable name, before densification.
    Index(usize),
    /// Map key as written in the variable name, before case matching.
    MapKey(String),
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Set(Kind),
    Materialize,
}

#[derive(Debug)]
struct Binding<'a> {
    var: &'a str,
    raw: &'a str,
    path: Vec<Segment>,
    action: Action,
}

/// Overlay the prefixed variables of `environ` onto `tree`.
///
/// Environment values replace file values leaf by leaf. The returned tree is
/// still a raw document; decoding and defaults happen in the merge stage.
pub fn bind_env(tree: Value, environ: &Environ) -> ConfigResult<Value> {
    let mut bindings = Vec::new();
    for (var, raw) in environ.with_prefix(ENV_PREFIX) {
        match resolve(&var[ENV_PREFIX.len()..]) {
            Some((path, action)) => bindings.push(Binding {
                var,
                raw,
                path,
                action,
            }),
            None => warn!(var = %var, "Ignoring unrecognized environment variable"),
        }
    }

    if bindings.is_empty() {
        return Ok(tree);
    }
    debug!(count = bindings.len(), "Binding environment variables");

    let positions = list_positions(&tree, &bindings);
    let mut overlay = Value::Object(Map::new());

    for binding in &bindings {
        let path = densify(&binding.path, &positions, &tree);
        match binding.action {
            Action::Set(kind) => {
                let value = coerce(binding.var, kind, binding.raw)?;
                *slot(&mut overlay, &path) = value;
            }
            Action::Materialize => {
                let enabled = parse_bool(binding.raw.trim()).ok_or_else(|| {
                    ConfigError::coercion(binding.var, Kind::Bool.expected(), binding.raw)
                })?;
                if enabled {
                    let target = slot(&mut overlay, &path);
                    if target.is_null() {
                        *target = Value::Object(Map::new());
                    }
                }
            }
        }
    }

    Ok(deep_merge(tree, overlay))
}

/// Map a variable name (without prefix) to a document path.
fn resolve(name: &str) -> Option<(Vec<Segment>, Action)> {
    let mut fields: &[Field] = schema::ROOT;
    let mut rest = name;
    let mut path = Vec::new();

    loop {
        let (head, tail) = match rest.split_once('_') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        let field = schema::lookup(fields, head)?;
        path.push(Segment::Key(field.key.to_string()));

        match (field.node, tail) {
            (Node::Leaf(kind), None) => return Some((path, Action::Set(kind))),
            (Node::Optional(_), None) => return Some((path, Action::Materialize)),
            (Node::Section(children) | Node::Optional(children), Some(tail)) => {
                fields = children;
                rest = tail;
            }
            (Node::Map(kind), Some(key)) if !key.is_empty() => {
                path.push(Segment::MapKey(key.to_string()));
                return Some((path, Action::Set(kind)));
            }
            (Node::List(children), Some(tail)) => {
                let (index, tail) = tail.split_once('_')?;
                if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                path.push(Segment::Index(index.parse().ok()?));
                fields = children;
                rest = tail;
            }
            _ => return None,
        }
    }
}

/// For every list addressed by the environment, the dense position of each
/// raw index. Indices that name an existing entry keep their position; the
/// others are appended after the existing entries in ascending order.
fn list_positions(tree: &Value, bindings: &[Binding<'_>]) -> BTreeMap<Vec<Segment>, BTreeMap<usize, usize>> {
    let mut indices: BTreeMap<Vec<Segment>, BTreeSet<usize>> = BTreeMap::new();
    for binding in bindings {
        for (at, segment) in binding.path.iter().enumerate() {
            if let Segment::Index(index) = segment {
                indices
                    .entry(binding.path[..at].to_vec())
                    .or_default()
                    .insert(*index);
            }
        }
    }

    indices
        .into_iter()
        .map(|(prefix, raw)| {
            let existing = lookup(tree, &prefix)
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let mut next = existing;
            let positions = raw
                .into_iter()
                .map(|index| {
                    if index < existing {
                        (index, index)
                    } else {
                        next += 1;
                        (index, next - 1)
                    }
                })
                .collect();
            (prefix, positions)
        })
        .collect()
}

/// Replace raw list indices with dense positions and map keys with the
/// spelling already used by the file, if any.
fn densify(
    path: &[Segment],
    positions: &BTreeMap<Vec<Segment>, BTreeMap<usize, usize>>,
    tree: &Value,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(path.len());
    for (at, segment) in path.iter().enumerate() {
        let segment = match segment {
            Segment::Index(raw) => {
                let dense = positions
                    .get(&path[..at])
                    .and_then(|p| p.get(raw))
                    .copied()
                    .unwrap_or(*raw);
                Segment::Index(dense)
            }
            Segment::MapKey(key) => {
                let existing = lookup(tree, &out)
                    .and_then(Value::as_object)
                    .and_then(|map| map.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned());
                Segment::Key(existing.unwrap_or_else(|| key.to_lowercase()))
            }
            Segment::Key(key) => Segment::Key(key.clone()),
        };
        out.push(segment);
    }
    out
}

fn lookup<'v>(tree: &'v Value, path: &[Segment]) -> Option<&'v Value> {
    path.iter().try_fold(tree, |node, segment| match segment {
        Segment::Key(key) | Segment::MapKey(key) => node.get(key.as_str()),
        Segment::Index(index) => node.get(*index),
    })
}

/// Walk `path` in the overlay, creating objects and null-padded arrays on
/// the way, and return the slot at the end.
fn slot<'v>(overlay: &'v mut Value, path: &[Segment]) -> &'v mut Value {
    let mut node = overlay;
    for segment in path {
        node = match segment {
            Segment::Key(key) | Segment::MapKey(key) => {
                if !node.is_object() {
                    *node = Value::Object(Map::new());
                }
                match node {
                    Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                    _ => unreachable!("node was just made an object"),
                }
            }
            Segment::Index(index) => {
                if !node.is_array() {
                    *node = Value::Array(Vec::new());
                }
                match node {
                    Value::Array(items) => {
                        if items.len() <= *index {
                            items.resize(*index + 1, Value::Null);
                        }
                        &mut items[*index]
                    }
                    _ => unreachable!("node was just made an array"),
                }
            }
        };
    }
    node
}

/// Render a configuration as the environment variables that would produce it.
///
/// Sections that are present but have no set leaf are emitted as
/// `<NAME>=true`. Map keys are upper-cased like every other segment.
///
/// Binding the result reproduces the configuration except for two lossy
/// cases, each logged with a warning:
/// - a map key with upper-case letters reads back lower-cased
/// - a list item containing `,` reads back as several items
pub fn encode(config: &Config) -> ConfigResult<Vec<(String, String)>> {
    let document = serde_json::to_value(config).map_err(|e| ConfigError::Render(e.to_string()))?;
    let mut out = Vec::new();
    encode_fields(schema::ROOT, &document, ENV_PREFIX.trim_end_matches('_'), &mut out);
    Ok(out)
}

fn encode_fields(fields: &[Field], node: &Value, name: &str, out: &mut Vec<(String, String)>) {
    for field in fields {
        let Some(value) = node.get(field.key).filter(|v| !v.is_null()) else {
            continue;
        };
        let name = format!("{}_{}", name, field.segment());
        match field.node {
            Node::Leaf(_) => {
                let split_items = value
                    .as_array()
                    .is_some_and(|items| items.iter().filter_map(Value::as_str).any(|item| item.contains(',')));
                if split_items {
                    warn!(var = %name, "List item contains ',' and will be split when read back");
                }
                if let Some(text) = scalar_text(value) {
                    out.push((name, text));
                }
            }
            Node::Section(children) => encode_fields(children, value, &name, out),
            Node::Optional(children) => {
                let before = out.len();
                encode_fields(children, value, &name, out);
                if out.len() == before {
                    out.push((name, "true".to_string()));
                }
            }
            Node::List(children) => {
                for (index, item) in value.as_array().into_iter().flatten().enumerate() {
                    encode_fields(children, item, &format!("{}_{}", name, index), out);
                }
            }
            Node::Map(_) => {
                for (key, item) in value.as_object().into_iter().flatten() {
                    let var = format!("{}_{}", name, key.to_uppercase());
                    if key.chars().any(char::is_uppercase) {
                        warn!(var = %var, key = %key, "Map key will be lower-cased when read back");
                    }
                    if let Some(text) = scalar_text(item) {
                        out.push((var, text));
                    }
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}
