//! Path-addressed operations on a [`Mapping`] tree.
//!
//! These functions hold no state and take no locks; the [`Store`](crate::core::Store)
//! serializes access around them.

use crate::core::path::KeyPath;
use crate::core::value::{Mapping, Value};
use crate::error::Result;

/// Find the value at `path`.
///
/// Descending into a scalar or a sequence is reported the same way as a
/// missing key.
///
/// # Errors
///
/// Returns [`ConfigError::KeyNotFound`](crate::error::ConfigError::KeyNotFound)
/// carrying the full key.
pub fn lookup<'a>(root: &'a Mapping, path: &KeyPath) -> Result<&'a Value> {
    let (parents, last) = path.split_last();
    let parent = walk(root, parents).ok_or_else(|| path.not_found())?;
    parent.get(last).ok_or_else(|| path.not_found())
}

/// Set the value at `path`, creating intermediate mappings as needed.
///
/// An intermediate entry that exists but is not a mapping is replaced by an
/// empty mapping, discarding the old value. The final entry is overwritten
/// whatever its previous type.
pub fn upsert(root: &mut Mapping, path: &KeyPath, value: Value) {
    let (parents, last) = path.split_last();
    insert_at(root, parents, last, value);
}

fn insert_at(map: &mut Mapping, parents: &[String], last: &str, value: Value) {
    match parents.split_first() {
        None => {
            map.insert(last.to_string(), value);
        }
        Some((segment, rest)) => match map.entry(segment.clone()).or_default() {
            Value::Mapping(child) => insert_at(child, rest, last, value),
            slot => {
                let mut child = Mapping::new();
                insert_at(&mut child, rest, last, value);
                *slot = Value::Mapping(child);
            }
        },
    }
}

/// Remove the value at `path` and return it.
///
/// # Errors
///
/// Returns [`ConfigError::KeyNotFound`](crate::error::ConfigError::KeyNotFound)
/// if any segment is missing; the tree is left untouched in that case.
pub fn delete(root: &mut Mapping, path: &KeyPath) -> Result<Value> {
    let (parents, last) = path.split_last();
    let parent = walk_mut(root, parents).ok_or_else(|| path.not_found())?;
    parent.remove(last).ok_or_else(|| path.not_found())
}

/// Deep-merge `overlay` on top of `base` into a new mapping.
///
/// Keys present on one side only are copied from that side. When both sides
/// hold a mapping under the same key the two are merged recursively;
/// otherwise the overlay's value wins, even if the types differ. Neither
/// input is modified.
///
/// # Examples
///
/// ```rust
/// use treeconf::core::{merge, Mapping, Value};
///
/// let mut db = Mapping::new();
/// db.insert("host".into(), Value::from("a"));
/// db.insert("port".into(), Value::from(1));
/// let mut base = Mapping::new();
/// base.insert("db".into(), Value::Mapping(db));
///
/// let mut db = Mapping::new();
/// db.insert("host".into(), Value::from("b"));
/// let mut overlay = Mapping::new();
/// overlay.insert("db".into(), Value::Mapping(db));
///
/// let merged = merge(&base, &overlay);
/// let db = merged["db"].as_mapping().unwrap();
/// assert_eq!(db["host"], Value::from("b"));
/// assert_eq!(db["port"], Value::from(1));
/// ```
pub fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut out = Mapping::new();
    for (key, base_value) in base {
        if !overlay.contains_key(key) {
            out.insert(key.clone(), base_value.clone());
        }
    }
    for (key, overlay_value) in overlay {
        let merged = match (base.get(key), overlay_value) {
            (Some(Value::Mapping(b)), Value::Mapping(o)) => Value::Mapping(merge(b, o)),
            _ => overlay_value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

fn walk<'a>(root: &'a Mapping, segments: &[String]) -> Option<&'a Mapping> {
    segments
        .iter()
        .try_fold(root, |current, segment| current.get(segment)?.as_mapping())
}

fn walk_mut<'a>(root: &'a mut Mapping, segments: &[String]) -> Option<&'a mut Mapping> {
    let mut current = root;
    for segment in segments {
        current = current.get_mut(segment)?.as_mapping_mut()?;
    }
    Some(current)
}
