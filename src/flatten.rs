//! Flatten a parsed TOML tree into dotted-path assignments on the registry.
//!
//! Tables extend the dotted prefix; every leaf is rendered to its canonical
//! string form and handed to the registry's `set`. `[atlanta] population =
//! 432427` becomes `set("atlanta.population", "432427")`.

use toml::{Table, Value};

use crate::error::ConfigError;
use crate::registry::Registry;

/// Assign every leaf of `table` to its declared setting.
///
/// The first failing key aborts the walk; assignments made before it are kept
/// (loading is not transactional). Empty tables assign nothing and are fine.
pub(crate) fn apply(registry: &Registry, table: &Table) -> Result<(), ConfigError> {
    walk(registry, table, "")
}

fn walk(registry: &Registry, table: &Table, prefix: &str) -> Result<(), ConfigError> {
    for (key, value) in table {
        let path = dotted(prefix, key);
        match value {
            Value::Table(subtree) => walk(registry, subtree, &path)?,
            leaf => registry
                .set(&path, &render_leaf(leaf))
                .map_err(|e| e.into_error(&path))?,
        }
    }
    Ok(())
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Canonical string form of a leaf: booleans as `true`/`false`, numbers in
/// base 10, strings without quoting. Anything else (datetimes, arrays) keeps
/// its TOML rendering — no declared setting type accepts those, so they
/// surface as a type mismatch naming the offending path.
fn render_leaf(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
