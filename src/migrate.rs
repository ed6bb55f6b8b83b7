//! Draft migration - rewrites draft-04 schemas into draft-06 or draft-07 shape.

use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::types::Draft;

/// Migrate a draft-04 schema to the draft named by `draft`.
///
/// `draft` is one of `"04"`, `"06"` or `"07"`.
///
/// # Errors
///
/// Returns `ConvertError::InvalidDraft` for any other selector.
pub fn migrate_draft(schema: &Value, draft: &str) -> Result<Value, ConvertError> {
    let target = Draft::parse(draft).ok_or_else(|| ConvertError::InvalidDraft {
        draft: draft.to_string(),
    })?;
    Ok(migrate(schema.clone(), target))
}

/// Migrate a draft-04 schema to `draft`.
///
/// Draft-04 returns the schema untouched. Draft-06 renames `id` to `$id`,
/// collapses single-value `enum` into `const`, turns boolean
/// `exclusiveMaximum`/`exclusiveMinimum` into their numeric form, and points
/// `$schema` at the draft-06 meta-schema. Draft-07 does the same with the
/// draft-07 meta-schema.
pub fn migrate(schema: Value, draft: Draft) -> Value {
    match draft {
        Draft::Draft04 => schema,
        Draft::Draft06 | Draft::Draft07 => {
            let mut schema = schema;
            migrate_schema(&mut schema);
            if let Value::Object(map) = &mut schema {
                map.insert(
                    "$schema".to_string(),
                    Value::String(draft.meta_schema_uri().to_string()),
                );
            }
            schema
        }
    }
}

/// Rename `from` to `to` in place, keeping the entry's position.
fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if !map.contains_key(from) {
        return;
    }
    *map = std::mem::take(map)
        .into_iter()
        .map(|(k, v)| if k == from { (to.to_string(), v) } else { (k, v) })
        .collect();
}

// --- Internal implementation ---

fn migrate_schema(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    if map.get("id").is_some_and(Value::is_string) && !map.contains_key("$id") {
        rename_key(map, "id", "$id");
    }

    collapse_single_enum(map);
    migrate_exclusive_bound(map, "exclusiveMaximum", "maximum");
    migrate_exclusive_bound(map, "exclusiveMinimum", "minimum");

    for (key, child) in map.iter_mut() {
        match key.as_str() {
            "properties" | "patternProperties" | "definitions" => {
                // Map of schemas; the keys are names, not keywords
                if let Value::Object(schemas) = child {
                    for schema in schemas.values_mut() {
                        migrate_schema(schema);
                    }
                }
            }
            "dependencies" => {
                // Schema dependencies only; property dependencies are string arrays
                if let Value::Object(deps) = child {
                    for dep in deps.values_mut().filter(|d| d.is_object()) {
                        migrate_schema(dep);
                    }
                }
            }
            "items" | "allOf" | "anyOf" | "oneOf" => match child {
                Value::Array(schemas) => schemas.iter_mut().for_each(migrate_schema),
                other => migrate_schema(other),
            },
            "additionalItems" | "additionalProperties" | "not" | "contains"
            | "propertyNames" => migrate_schema(child),
            _ => {}
        }
    }
}

/// `{ "type": ..., "enum": [x] }` becomes `{ "type": ..., "const": x }`.
fn collapse_single_enum(map: &mut Map<String, Value>) {
    if !map.contains_key("type") || map.contains_key("const") {
        return;
    }
    let single = matches!(map.get("enum"), Some(Value::Array(values)) if values.len() == 1);
    if !single {
        return;
    }

    rename_key(map, "enum", "const");
    let value = match map.get_mut("const") {
        Some(Value::Array(values)) => values.pop().unwrap_or(Value::Null),
        _ => return,
    };
    map.insert("const".to_string(), value);
}

/// Draft-04 `exclusiveMaximum: true` + `maximum: n` becomes draft-06
/// `exclusiveMaximum: n`. Same for the minimum pair.
fn migrate_exclusive_bound(map: &mut Map<String, Value>, exclusive: &str, bound: &str) {
    let Some(&Value::Bool(is_exclusive)) = map.get(exclusive) else {
        return;
    };

    let limit = map.get(bound).filter(|b| b.is_number()).cloned();
    match (is_exclusive, limit) {
        (true, Some(limit)) => {
            map.shift_remove(bound);
            map.insert(exclusive.to_string(), limit);
        }
        _ => {
            map.shift_remove(exclusive);
        }
    }
}
