//! Environment variable expansion in decoded string values.

use crate::core::{Mapping, Value};
use std::env;

/// Replace `$NAME` and `${NAME}` with the value of the environment variable
/// `NAME`, or with the empty string when it is unset.
///
/// A `$` that does not start a variable reference is kept as is.
///
/// # Examples
///
/// ```rust
/// use treeconf::codec::expand_env;
///
/// assert_eq!(expand_env("cost: 5$"), "cost: 5$");
/// assert_eq!(expand_env("${TREECONF_DOC_SURELY_UNSET}/data"), "/data");
/// ```
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| env::var(name).unwrap_or_default())
}

/// Apply [`expand_env`] to every string value in the tree. Keys are left alone.
pub fn expand_tree(tree: &mut Mapping) {
    for value in tree.values_mut() {
        expand_value(value);
    }
}

fn expand_value(value: &mut Value) {
    match value {
        Value::String(s) if s.contains('$') => *s = expand_env(s),
        Value::Sequence(items) => items.iter_mut().for_each(expand_value),
        Value::Mapping(map) => expand_tree(map),
        _ => {}
    }
}

fn expand_with(input: &str, lookup: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]));
                rest = &braced[end + 1..];
                continue;
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if end > 0 {
                out.push_str(&lookup(&after[..end]));
                rest = &after[end..];
                continue;
            }
        }

        out.push('$');
        rest = after;
    }

    out.push_str(rest);
    out
}
