//! Deep merge of an override table onto a derived field table.
//!
//! Rules, applied key by key:
//! - a key set in the override wins over the derived value
//! - `items`, `schema` and nested JSON objects under extra keys merge recursively
//! - lists (`enum`, JSON arrays) merge by index; the target keeps any tail
//!   longer than the override
//! - names only present in the override are inserted as given
use indexmap::map::Entry;
use serde_json::Value;

use crate::field::{FieldDescriptor, FieldTable};

impl FieldTable {
    pub fn merge(&mut self, overrides: FieldTable) {
        for (name, descriptor) in overrides {
            match self.entries_mut().entry(name) {
                Entry::Occupied(mut slot) => slot.get_mut().merge(descriptor),
                Entry::Vacant(slot) => {
                    slot.insert(descriptor);
                }
            }
        }
    }
}

impl FieldDescriptor {
    pub fn merge(&mut self, other: FieldDescriptor) {
        let FieldDescriptor { field_type, required, enum_values, validate, default, items, schema, extra } = other;
        if field_type.is_some() { self.field_type = field_type; }
        if required.is_some() { self.required = required; }
        if validate.is_some() { self.validate = validate; }

        if let Some(values) = enum_values {
            match self.enum_values.as_mut() {
                Some(current) => merge_list(current, values),
                None => self.enum_values = Some(values),
            }
        }

        if let Some(default) = default {
            match self.default.as_mut() {
                Some(current) => merge_value(current, default),
                None => self.default = Some(default),
            }
        }

        if let Some(items) = items {
            match self.items.as_mut() {
                Some(current) => current.merge(*items),
                None => self.items = Some(items),
            }
        }

        if let Some(schema) = schema {
            match self.schema.as_mut() {
                Some(current) => current.merge(schema),
                None => self.schema = Some(schema),
            }
        }

        for (key, value) in extra {
            match self.extra.entry(key) {
                Entry::Occupied(mut slot) => merge_value(slot.get_mut(), value),
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
    }
}

/// Position `i` of `source` merges into position `i` of `target`.
pub fn merge_list(target: &mut Vec<Value>, source: Vec<Value>) {
    for (index, value) in source.into_iter().enumerate() {
        match target.get_mut(index) {
            Some(slot) => merge_value(slot, value),
            None => target.push(value),
        }
    }
}

/// JSON deep merge: objects per key, arrays per index, anything else is replaced.
pub fn merge_value(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Array(target), Value::Array(source)) => merge_list(target, source),
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldType, Validator};
    use serde_json::json;

    fn table(value: Value) -> FieldTable {
        FieldTable::from_value(value).unwrap()
    }

    #[test]
    fn override_only_names_are_added() {
        let mut derived = table(json!({ "name": { "type": "String", "required": true } }));
        derived.merge(table(json!({ "city": { "type": "String", "required": true } })));
        assert_eq!(derived.keys().collect::<Vec<_>>(), vec!["name", "city"]);
        assert!(derived["city"].is_required());
    }

    #[test]
    fn scalars_are_replaced() {
        let mut derived = table(json!({ "name": { "type": "String", "required": true } }));
        derived.merge(table(json!({ "name": { "type": "String", "required": false } })));
        assert_eq!(derived["name"].required, Some(false));
    }

    #[test]
    fn partial_override_keeps_siblings() {
        let mut derived = table(json!({ "id": { "type": "String", "required": true } }));
        derived.merge(table(json!({ "id": { "generate": "uuid" } })));
        assert_eq!(derived["id"].field_type, Some(FieldType::String));
        assert!(derived["id"].is_required());
        assert_eq!(derived["id"].extra["generate"], json!("uuid"));
    }

    #[test]
    fn nested_schema_and_items_merge_recursively() {
        let mut derived = table(json!({
            "user": {
                "type": "Object",
                "schema": { "name": { "type": "String" }, "age": { "type": "Number" } }
            },
            "cars": {
                "type": "Array",
                "items": { "type": "Object", "schema": { "color": { "type": "String" } } }
            }
        }));
        derived.merge(table(json!({
            "user": { "schema": { "name": { "required": true } } },
            "cars": { "items": { "schema": { "color": { "enum": ["red"] } } } }
        })));

        let user = derived["user"].schema.as_ref().unwrap();
        assert_eq!(user["name"].field_type, Some(FieldType::String));
        assert!(user["name"].is_required());
        assert_eq!(user["age"].field_type, Some(FieldType::Number));

        let car = derived["cars"].items.as_ref().unwrap();
        assert_eq!(car.field_type, Some(FieldType::Object));
        let color = &car.schema.as_ref().unwrap()["color"];
        assert_eq!(color.field_type, Some(FieldType::String));
        assert_eq!(color.enum_values, Some(vec![json!("red")]));
    }

    #[test]
    fn enum_lists_merge_by_index() {
        let mut derived = table(json!({ "color": { "type": "String", "enum": ["red", "green", "blue"] } }));
        derived.merge(table(json!({ "color": { "enum": ["cyan"] } })));
        assert_eq!(derived["color"].enum_values, Some(vec![json!("cyan"), json!("green"), json!("blue")]));

        derived.merge(table(json!({ "color": { "enum": ["a", "b", "c", "d"] } })));
        assert_eq!(
            derived["color"].enum_values,
            Some(vec![json!("a"), json!("b"), json!("c"), json!("d")])
        );
    }

    #[test]
    fn enum_override_on_a_field_without_enum_is_inserted() {
        let mut derived = table(json!({ "size": { "type": "String" } }));
        derived.merge(table(json!({ "size": { "enum": ["S", "M"] } })));
        assert_eq!(derived["size"].enum_values, Some(vec![json!("S"), json!("M")]));
    }

    #[test]
    fn json_arrays_merge_by_index_and_recurse() {
        let mut target = json!({ "index": [{ "name": "pk", "hash": true }, { "name": "sk" }, { "name": "gs1" }] });
        merge_value(&mut target, json!({ "index": [{ "hash": false }, "replaced"] }));
        assert_eq!(target, json!({
            "index": [{ "name": "pk", "hash": false }, "replaced", { "name": "gs1" }]
        }));
    }

    #[test]
    fn validate_override_replaces_the_pattern() {
        let mut derived = table(json!({ "code": { "type": "String", "validate": "^[A-Z]+$" } }));
        derived.merge(table(json!({ "code": { "validate": "^[a-z]+$" } })));
        assert_eq!(derived["code"].validate, Some(Validator::new("^[a-z]+$").unwrap()));
    }

    #[test]
    fn extra_json_objects_deep_merge() {
        let mut target = json!({ "map": { "a": 1, "b": { "c": 2 } }, "keep": true });
        merge_value(&mut target, json!({ "map": { "b": { "d": 3 } }, "keep": null }));
        assert_eq!(target, json!({ "map": { "a": 1, "b": { "c": 2, "d": 3 } }, "keep": null }));
    }
}
