//! Runtime schemas
//!
//! A [`Schema`] describes a destination shape as data, so documents can be
//! decoded without a Rust type for every page. [`DynamicValue`] is the
//! destination built from a schema; after decoding it converts to JSON.
//!
//! ```json
//! {
//!   "type": "record",
//!   "fields": [
//!     { "name": "title", "tag": "h1", "schema": { "type": "string" } },
//!     { "name": "links", "tag": "a", "schema": { "type": "list", "item": { "type": "string" } } }
//!   ]
//! }
//! ```

use crate::destination::{Array, Dest, Field, MapSink, Nodes, Record, Scalar, Sequence, Unmarshal};
use crate::error::{BoxError, ConversionError, UnmarshalResult};
use crate::scalar::parse_bool;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Shape of a dynamically decoded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    String,
    Integer,
    Float,
    Boolean,
    /// Any literal, kept as a string
    Any,
    /// Matched nodes, rendered as their outer markup
    Html,
    Record {
        fields: Vec<FieldSchema>,
    },
    List {
        item: Box<Schema>,
    },
    Array {
        len: usize,
        item: Box<Schema>,
    },
    /// Map with string keys
    Map {
        value: Box<Schema>,
    },
}

/// One field of a record schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Annotation for the field, empty to skip it
    #[serde(default)]
    pub tag: String,
    pub schema: Schema,
}

impl Schema {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

/// Literal kinds a dynamic scalar can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
    Any,
}

/// Scalar slot of a [`DynamicValue`]
#[derive(Debug, Clone)]
pub struct DynamicScalar {
    kind: ScalarKind,
    value: Value,
}

impl Scalar for DynamicScalar {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
        let conversion_error = |target| ConversionError {
            literal: literal.to_string(),
            target,
        };

        self.value = match self.kind {
            ScalarKind::String | ScalarKind::Any => Value::String(literal.to_string()),
            ScalarKind::Integer => Value::Number(
                literal
                    .parse::<i64>()
                    .map(Number::from)
                    .map_err(|_| conversion_error("integer"))?,
            ),
            ScalarKind::Float => {
                let float = literal.parse::<f64>().map_err(|_| conversion_error("float"))?;
                Number::from_f64(float)
                    .map(Value::Number)
                    .ok_or_else(|| conversion_error("float"))?
            }
            ScalarKind::Boolean => {
                Value::Bool(parse_bool(literal).ok_or_else(|| conversion_error("boolean"))?)
            }
        };
        Ok(())
    }
}

/// Record slot of a [`DynamicValue`]
#[derive(Debug, Clone)]
pub struct DynamicRecord<'s, 'doc> {
    fields: Vec<(&'s FieldSchema, DynamicValue<'s, 'doc>)>,
}

impl<'s, 'doc> Record<'doc> for DynamicRecord<'s, 'doc> {
    fn fields(&mut self) -> Vec<Field<'_, 'doc>> {
        self.fields
            .iter_mut()
            .map(|(schema, value)| Field {
                name: schema.name.as_str(),
                tag: schema.tag.as_str(),
                accepts_raw_nodes: false,
                value,
            })
            .collect()
    }
}

/// List slot of a [`DynamicValue`]
#[derive(Debug, Clone)]
pub struct DynamicList<'s, 'doc> {
    item: &'s Schema,
    items: Vec<DynamicValue<'s, 'doc>>,
}

impl<'s, 'doc> Sequence<'doc> for DynamicList<'s, 'doc> {
    fn push_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()> {
        let mut item = DynamicValue::new(self.item);
        decode(&mut item)?;
        self.items.push(item);
        Ok(())
    }
}

/// Fixed length slot of a [`DynamicValue`]
#[derive(Debug, Clone)]
pub struct DynamicArray<'s, 'doc> {
    items: Vec<DynamicValue<'s, 'doc>>,
}

impl<'s, 'doc> Array<'doc> for DynamicArray<'s, 'doc> {
    fn array_len(&self) -> usize {
        self.items.len()
    }

    fn element_mut(&mut self, index: usize) -> &mut dyn Unmarshal<'doc> {
        &mut self.items[index]
    }
}

/// Map slot of a [`DynamicValue`]
#[derive(Debug, Clone)]
pub struct DynamicMap<'s, 'doc> {
    value: &'s Schema,
    entries: Vec<(String, DynamicValue<'s, 'doc>)>,
}

impl<'s, 'doc> MapSink<'doc> for DynamicMap<'s, 'doc> {
    fn insert_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>, &mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()> {
        let mut key = String::new();
        let mut value = DynamicValue::new(self.value);
        decode(&mut key, &mut value)?;

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }
}

/// Destination shaped by a [`Schema`]
#[derive(Debug, Clone)]
pub enum DynamicValue<'s, 'doc> {
    Scalar(DynamicScalar),
    Nodes(Nodes<'doc>),
    Record(DynamicRecord<'s, 'doc>),
    List(DynamicList<'s, 'doc>),
    Array(DynamicArray<'s, 'doc>),
    Map(DynamicMap<'s, 'doc>),
}

impl<'s, 'doc> DynamicValue<'s, 'doc> {
    /// Empty value shaped like `schema`
    pub fn new(schema: &'s Schema) -> Self {
        let scalar = |kind| {
            DynamicValue::Scalar(DynamicScalar {
                kind,
                value: Value::Null,
            })
        };

        match schema {
            Schema::String => scalar(ScalarKind::String),
            Schema::Integer => scalar(ScalarKind::Integer),
            Schema::Float => scalar(ScalarKind::Float),
            Schema::Boolean => scalar(ScalarKind::Boolean),
            Schema::Any => scalar(ScalarKind::Any),
            Schema::Html => DynamicValue::Nodes(Nodes::default()),
            Schema::Record { fields } => DynamicValue::Record(DynamicRecord {
                fields: fields
                    .iter()
                    .map(|field| (field, DynamicValue::new(&field.schema)))
                    .collect(),
            }),
            Schema::List { item } => DynamicValue::List(DynamicList {
                item,
                items: Vec::new(),
            }),
            Schema::Array { len, item } => DynamicValue::Array(DynamicArray {
                items: (0..*len).map(|_| DynamicValue::new(item)).collect(),
            }),
            Schema::Map { value } => DynamicValue::Map(DynamicMap {
                value,
                entries: Vec::new(),
            }),
        }
    }

    /// Convert the decoded value to JSON
    ///
    /// Scalars that were never decoded become `null`; record fields keep the
    /// schema's field order.
    pub fn to_json(&self) -> Value {
        match self {
            DynamicValue::Scalar(scalar) => scalar.value.clone(),
            DynamicValue::Nodes(nodes) => Value::Array(
                Selection::from_nodes(nodes.as_slice().iter().copied())
                    .outer_html()
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
            DynamicValue::Record(record) => Value::Object(
                record
                    .fields
                    .iter()
                    .map(|(schema, value)| (schema.name.clone(), value.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            DynamicValue::List(list) => {
                Value::Array(list.items.iter().map(DynamicValue::to_json).collect())
            }
            DynamicValue::Array(array) => {
                Value::Array(array.items.iter().map(DynamicValue::to_json).collect())
            }
            DynamicValue::Map(map) => Value::Object(
                map.entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl<'s, 'doc> Unmarshal<'doc> for DynamicValue<'s, 'doc> {
    fn destination(&mut self) -> Dest<'_, 'doc> {
        match self {
            DynamicValue::Scalar(scalar) => Dest::Scalar(scalar),
            DynamicValue::Nodes(nodes) => Dest::Nodes(&mut nodes.0),
            DynamicValue::Record(record) => Dest::Record(record),
            DynamicValue::List(list) => Dest::Seq(list),
            DynamicValue::Array(array) => Dest::Array(array),
            DynamicValue::Map(map) => Dest::Map(map),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Scalar(_) => "DynamicValue::Scalar",
            DynamicValue::Nodes(_) => "DynamicValue::Nodes",
            DynamicValue::Record(_) => "DynamicValue::Record",
            DynamicValue::List(_) => "DynamicValue::List",
            DynamicValue::Array(_) => "DynamicValue::Array",
            DynamicValue::Map(_) => "DynamicValue::Map",
        }
    }
}
