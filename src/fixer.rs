//! Structural fix-ups applied to the raw parser output.
//!
//! The RAML parser emits draft-04 shaped schemas that still carry RAML
//! quirks: `type: "file"`, `x-amf-*` vendor keywords and `examples` written
//! as a mapping. Each pass here rewrites one of those, everywhere in the
//! tree.
//!
//! Passes borrow their input and return `Cow::Borrowed` of the very same
//! value when nothing matched, so untouched inputs keep their identity.
//! Matching subtrees are rebuilt; nothing is mutated in place.

use std::borrow::Cow;

use serde_json::{json, Map, Value};

use crate::types::X_AMF_PREFIX;

const FILE_TYPES_KEY: &str = "x-amf-fileTypes";

/// A rewrite of single JSON objects, applied bottom-up by [`transform`].
trait ObjectRewrite {
    /// Whether `map` needs rewriting.
    fn matches(&self, map: &Map<String, Value>) -> bool;

    /// Rewrite a matching object. Children are already rewritten.
    fn apply(&self, map: Map<String, Value>) -> Map<String, Value>;
}

/// Replace RAML `type: "file"` with a binary string schema.
///
/// `{ "type": "file" }` becomes
/// `{ "type": "string", "media": { "binaryEncoding": "binary" } }`. A
/// non-empty `x-amf-fileTypes` array is consumed into `media.anyOf`, one
/// `{ "mediaType": ... }` per entry, in order.
pub fn fix_file_type_properties(value: &Value) -> Cow<'_, Value> {
    transform(value, &FileTypes)
}

/// Strip the `x-amf-` prefix from every key.
///
/// When the stripped name already exists in the same object, the entry
/// that comes later wins.
pub fn remove_x_amf_properties(value: &Value) -> Cow<'_, Value> {
    transform(value, &VendorKeys)
}

/// Turn `examples` mappings into arrays of their values.
///
/// Keys are dropped and values keep their order. Array-valued `examples`
/// are left alone.
pub fn fix_structure_inconsistencies(value: &Value) -> Cow<'_, Value> {
    transform(value, &ExamplesShape)
}

/// Run every structural fix-up over a raw parser schema.
///
/// File types go first so `x-amf-fileTypes` is consumed before the vendor
/// prefix pass would rename it.
pub fn fix_schema(schema: Value) -> Value {
    let schema = run_pass(schema, fix_file_type_properties);
    let schema = run_pass(schema, remove_x_amf_properties);
    run_pass(schema, fix_structure_inconsistencies)
}

fn run_pass(schema: Value, pass: for<'a> fn(&'a Value) -> Cow<'a, Value>) -> Value {
    let rewritten = match pass(&schema) {
        Cow::Borrowed(_) => None,
        Cow::Owned(value) => Some(value),
    };
    rewritten.unwrap_or(schema)
}

struct FileTypes;

impl ObjectRewrite for FileTypes {
    fn matches(&self, map: &Map<String, Value>) -> bool {
        map.get("type").and_then(Value::as_str) == Some("file")
    }

    fn apply(&self, mut map: Map<String, Value>) -> Map<String, Value> {
        let mut media = Map::new();
        media.insert("binaryEncoding".to_string(), json!("binary"));

        if let Some(Value::Array(file_types)) = map.shift_remove(FILE_TYPES_KEY) {
            if !file_types.is_empty() {
                let any_of = file_types
                    .into_iter()
                    .map(|media_type| json!({ "mediaType": media_type }))
                    .collect();
                media.insert("anyOf".to_string(), Value::Array(any_of));
            }
        }

        map.insert("type".to_string(), json!("string"));
        map.insert("media".to_string(), Value::Object(media));
        map
    }
}

struct VendorKeys;

impl ObjectRewrite for VendorKeys {
    fn matches(&self, map: &Map<String, Value>) -> bool {
        map.keys().any(|k| k.starts_with(X_AMF_PREFIX))
    }

    fn apply(&self, map: Map<String, Value>) -> Map<String, Value> {
        let mut result = Map::new();
        for (key, value) in map {
            let key = match key.strip_prefix(X_AMF_PREFIX) {
                Some(stripped) => stripped.to_string(),
                None => key,
            };
            result.insert(key, value);
        }
        result
    }
}

struct ExamplesShape;

impl ObjectRewrite for ExamplesShape {
    fn matches(&self, map: &Map<String, Value>) -> bool {
        map.get("examples").is_some_and(Value::is_object)
    }

    fn apply(&self, mut map: Map<String, Value>) -> Map<String, Value> {
        if let Some(Value::Object(examples)) = map.get_mut("examples").map(Value::take) {
            let values = examples.into_iter().map(|(_, v)| v).collect();
            map.insert("examples".to_string(), Value::Array(values));
        }
        map
    }
}

// --- Internal implementation ---

fn transform<'a, R: ObjectRewrite>(value: &'a Value, rewrite: &R) -> Cow<'a, Value> {
    match value {
        Value::Object(map) => {
            let children = transform_object(map, rewrite);
            if rewrite.matches(&children) {
                return Cow::Owned(Value::Object(rewrite.apply(children.into_owned())));
            }
            match children {
                Cow::Borrowed(_) => Cow::Borrowed(value),
                Cow::Owned(map) => Cow::Owned(Value::Object(map)),
            }
        }
        Value::Array(items) => {
            let children: Vec<Cow<'a, Value>> =
                items.iter().map(|item| transform(item, rewrite)).collect();
            if children.iter().all(|c| matches!(c, Cow::Borrowed(_))) {
                Cow::Borrowed(value)
            } else {
                Cow::Owned(Value::Array(
                    children.into_iter().map(Cow::into_owned).collect(),
                ))
            }
        }
        // Scalars pass through unchanged
        _ => Cow::Borrowed(value),
    }
}

fn transform_object<'a, R: ObjectRewrite>(
    map: &'a Map<String, Value>,
    rewrite: &R,
) -> Cow<'a, Map<String, Value>> {
    let children: Vec<(&'a String, Cow<'a, Value>)> = map
        .iter()
        .map(|(key, child)| (key, transform(child, rewrite)))
        .collect();

    if children.iter().all(|(_, c)| matches!(c, Cow::Borrowed(_))) {
        return Cow::Borrowed(map);
    }

    Cow::Owned(
        children
            .into_iter()
            .map(|(key, child)| (key.clone(), child.into_owned()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn non_objects() -> Vec<Value> {
        vec![
            json!("foo"),
            json!(3),
            json!(["zoo"]),
            Value::Null,
            json!(3.4),
        ]
    }

    fn is_same(result: &Cow<'_, Value>, input: &Value) -> bool {
        matches!(result, Cow::Borrowed(r) if std::ptr::eq(*r, input))
    }

    // === fix_file_type_properties ===

    #[test]
    fn file_types_ignore_non_objects() {
        for el in non_objects() {
            assert!(is_same(&fix_file_type_properties(&el), &el));
        }
    }

    #[test]
    fn file_types_ignore_objects_without_file_type() {
        let data = json!({ "foo": 1 });
        assert!(is_same(&fix_file_type_properties(&data), &data));

        let data = json!({ "type": "string", "x-amf-fileTypes": ["image/png"] });
        assert!(is_same(&fix_file_type_properties(&data), &data));
    }

    #[test]
    fn file_type_becomes_binary_string() {
        let data = json!({ "type": "file" });
        assert_eq!(
            fix_file_type_properties(&data).into_owned(),
            json!({
                "type": "string",
                "media": { "binaryEncoding": "binary" }
            })
        );
    }

    #[test]
    fn empty_file_types_add_no_any_of() {
        let data = json!({ "type": "file", "x-amf-fileTypes": [] });
        assert_eq!(
            fix_file_type_properties(&data).into_owned(),
            json!({
                "type": "string",
                "media": { "binaryEncoding": "binary" }
            })
        );
    }

    #[test]
    fn file_types_become_media_any_of_in_order() {
        let data = json!({
            "type": "file",
            "x-amf-fileTypes": ["image/png", "image/jpg"]
        });
        assert_eq!(
            fix_file_type_properties(&data).into_owned(),
            json!({
                "type": "string",
                "media": {
                    "binaryEncoding": "binary",
                    "anyOf": [
                        { "mediaType": "image/png" },
                        { "mediaType": "image/jpg" }
                    ]
                }
            })
        );
    }

    #[test]
    fn file_types_apply_at_any_depth() {
        let data = json!({
            "type": "object",
            "properties": {
                "avatar": { "type": "file", "x-amf-fileTypes": ["image/png"] },
                "name": { "type": "string" }
            },
            "anyOf": [{ "type": "file" }]
        });
        let fixed = fix_file_type_properties(&data).into_owned();
        assert_eq!(
            fixed["properties"]["avatar"],
            json!({
                "type": "string",
                "media": {
                    "binaryEncoding": "binary",
                    "anyOf": [{ "mediaType": "image/png" }]
                }
            })
        );
        assert_eq!(fixed["properties"]["name"], json!({ "type": "string" }));
        assert_eq!(fixed["anyOf"][0]["type"], "string");
    }

    // === remove_x_amf_properties ===

    #[test]
    fn vendor_keys_ignore_non_objects() {
        for el in non_objects() {
            assert!(is_same(&remove_x_amf_properties(&el), &el));
        }
    }

    #[test]
    fn vendor_prefixes_are_removed() {
        let data = json!({ "name": "john", "x-amf-age": 123 });
        assert_eq!(
            remove_x_amf_properties(&data).into_owned(),
            json!({ "name": "john", "age": 123 })
        );
    }

    #[test]
    fn vendor_prefixes_are_removed_at_any_depth() {
        let data = json!({
            "properties": {
                "pet": {
                    "type": "object",
                    "x-amf-discriminatorValue": "cat",
                    "items": [{ "x-amf-union": [{ "x-amf-x": 1 }] }]
                }
            }
        });
        assert_eq!(
            remove_x_amf_properties(&data).into_owned(),
            json!({
                "properties": {
                    "pet": {
                        "type": "object",
                        "discriminatorValue": "cat",
                        "items": [{ "union": [{ "x": 1 }] }]
                    }
                }
            })
        );
    }

    #[test]
    fn vendor_key_position_is_kept() {
        let data = json!({ "a": 1, "x-amf-b": 2, "c": 3 });
        let fixed = remove_x_amf_properties(&data).into_owned();
        let keys: Vec<&str> = fixed.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn later_entry_wins_on_vendor_key_collision() {
        let data = json!({ "age": 1, "x-amf-age": 2 });
        assert_eq!(
            remove_x_amf_properties(&data).into_owned(),
            json!({ "age": 2 })
        );
    }

    #[test]
    fn vendor_prefix_only_stripped_from_keys() {
        let data = json!({ "description": "x-amf-age" });
        assert!(is_same(&remove_x_amf_properties(&data), &data));
    }

    // === fix_structure_inconsistencies ===

    #[test]
    fn examples_ignore_non_objects() {
        for el in non_objects() {
            assert!(is_same(&fix_structure_inconsistencies(&el), &el));
        }
    }

    #[test]
    fn examples_ignore_objects_without_examples() {
        let data = json!({ "foo": 1 });
        assert!(is_same(&fix_structure_inconsistencies(&data), &data));
    }

    #[test]
    fn examples_object_becomes_array() {
        let data = json!({
            "examples": {
                "catone": "CatOne",
                "dogone": "DogOne"
            }
        });
        assert_eq!(
            fix_structure_inconsistencies(&data).into_owned(),
            json!({ "examples": ["CatOne", "DogOne"] })
        );
    }

    #[test]
    fn examples_array_is_kept() {
        let data = json!({ "examples": ["CatOne", "DogOne"] });
        let fixed = fix_structure_inconsistencies(&data);
        assert!(is_same(&fixed, &data));
        assert_eq!(fixed.into_owned(), json!({ "examples": ["CatOne", "DogOne"] }));
    }

    #[test]
    fn nested_examples_are_fixed() {
        let data = json!({
            "properties": {
                "name": {
                    "type": "string",
                    "examples": { "first": "john", "second": "jane" }
                }
            }
        });
        let fixed = fix_structure_inconsistencies(&data).into_owned();
        assert_eq!(fixed["properties"]["name"]["examples"], json!(["john", "jane"]));
    }

    // === fix_schema ===

    #[test]
    fn fix_schema_consumes_file_types_before_stripping_prefixes() {
        let raw = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "object",
            "x-amf-merge": true,
            "properties": {
                "photo": { "type": "file", "x-amf-fileTypes": ["image/png"] }
            },
            "examples": { "one": { "photo": "..." } }
        });
        assert_eq!(
            fix_schema(raw),
            json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "type": "object",
                "merge": true,
                "properties": {
                    "photo": {
                        "type": "string",
                        "media": {
                            "binaryEncoding": "binary",
                            "anyOf": [{ "mediaType": "image/png" }]
                        }
                    }
                },
                "examples": [{ "photo": "..." }]
            })
        );
    }

    #[test]
    fn fix_schema_is_idempotent() {
        let raw = json!({
            "type": "file",
            "x-amf-fileTypes": ["a/b"],
            "x-amf-examples": { "a": 1 }
        });
        let once = fix_schema(raw);
        let twice = fix_schema(once.clone());
        assert_eq!(once, twice);
    }
}
