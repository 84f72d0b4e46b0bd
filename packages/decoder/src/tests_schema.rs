use crate::{Document, DynamicValue, Reason, Schema, UnmarshalError};
use serde_json::{json, Value};

fn decode(schema: &str, source: &str) -> Result<Value, UnmarshalError> {
    let schema = Schema::from_json(schema).unwrap();
    let document = Document::parse(source);
    let mut value = DynamicValue::new(&schema);
    document.unmarshal(&mut value)?;
    Ok(value.to_json())
}

#[test]
fn test_record_with_scalars() {
    let output = decode(
        r#"{
            "type": "record",
            "fields": [
                { "name": "title", "tag": "h1", "schema": { "type": "string" } },
                { "name": "stock", "tag": ".stock", "schema": { "type": "integer" } },
                { "name": "price", "tag": ".price", "schema": { "type": "float" } },
                { "name": "sale", "tag": ".sale", "schema": { "type": "boolean" } },
                { "name": "sku", "tag": ",[data-sku]", "schema": { "type": "any" } },
                { "name": "untagged", "schema": { "type": "string" } }
            ]
        }"#,
        r#"<h1>Kettle</h1><i class="stock">12</i><i class="price">19.5</i><i class="sale">false</i>"#,
    )
    .unwrap();

    assert_eq!(
        output,
        json!({
            "title": "Kettle",
            "stock": 12,
            "price": 19.5,
            "sale": false,
            "sku": "",
            "untagged": null
        })
    );
}

#[test]
fn test_html_schema_renders_markup() {
    let output = decode(
        r#"{
            "type": "record",
            "fields": [
                { "name": "notes", "tag": "p.note", "schema": { "type": "html" } }
            ]
        }"#,
        r#"<p class="note">one <b>bold</b></p><p>other</p>"#,
    )
    .unwrap();

    assert_eq!(
        output,
        json!({ "notes": ["<p class=\"note\">one <b>bold</b></p>"] })
    );
}

#[test]
fn test_map_and_array_schemas() {
    let output = decode(
        r#"{
            "type": "record",
            "fields": [
                {
                    "name": "terms",
                    "tag": "dl,dt,[title]",
                    "schema": { "type": "map", "value": { "type": "string" } }
                },
                {
                    "name": "pair",
                    "tag": "li",
                    "schema": { "type": "array", "len": 2, "item": { "type": "integer" } }
                }
            ]
        }"#,
        r#"<dl><dt title="a">alpha</dt><dt title="b">beta</dt></dl><ul><li>1</li><li>2</li></ul>"#,
    )
    .unwrap();

    assert_eq!(
        output,
        json!({
            "terms": { "alpha": "a", "beta": "b" },
            "pair": [1, 2]
        })
    );
}

#[test]
fn test_list_of_records() {
    let output = decode(
        r#"{
            "type": "list",
            "item": {
                "type": "record",
                "fields": [
                    { "name": "href", "tag": ",[href]", "schema": { "type": "string" } }
                ]
            }
        }"#,
        r#"<a href="/a">a</a>"#,
    )
    .unwrap();

    // The top level list decodes the document node itself
    assert_eq!(output, json!([{ "href": "" }]));
}

#[test]
fn test_schema_errors_name_dynamic_types() {
    let err = decode(
        r#"{
            "type": "record",
            "fields": [
                {
                    "name": "pair",
                    "tag": "li",
                    "schema": { "type": "array", "len": 2, "item": { "type": "integer" } }
                }
            ]
        }"#,
        "<ul><li>1</li></ul>",
    )
    .unwrap_err();

    assert_eq!(err.type_name, "DynamicValue::Record");
    assert_eq!(err.path_string(), ".pair");

    let inner = err.innermost();
    assert_eq!(inner.type_name, "DynamicValue::Array");
    assert_eq!(inner.reason, Reason::ArrayLengthMismatch { expected: 2, found: 1 });
}

#[test]
fn test_unknown_schema_type() {
    assert!(Schema::from_json(r#"{ "type": "tuple" }"#).is_err());
}
