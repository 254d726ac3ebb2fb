use deltax_core::{DiffAdapter, DiffEngine};
use deltax_core_types::Value;
use serde::{Deserialize, Serialize};

/// A minimal diffable entity type for testing: a keyed record holding named
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub fields: Vec<Field>,
}

/// A named field owned by one [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// Adapter exposing [`Record`] keys and fields to the diff engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAdapter;

impl DiffAdapter<Record, Field, String> for RecordAdapter {
    fn entity_id(&self, entity: &Record) -> String {
        entity.id.clone()
    }

    fn property_id(&self, property: &Field) -> String {
        property.name.clone()
    }

    fn properties(&self, entity: &Record) -> Vec<Field> {
        entity.fields.clone()
    }

    fn property(&self, entity: &Record, id: &String) -> Option<Field> {
        entity.fields.iter().find(|f| &f.name == id).cloned()
    }
}

/// Build a record with text-valued fields.
#[allow(dead_code)]
pub fn record(id: &str, fields: &[(&str, &str)]) -> Record {
    Record {
        id: id.to_string(),
        fields: fields
            .iter()
            .map(|(name, value)| Field {
                name: name.to_string(),
                value: Value::from(*value),
            })
            .collect(),
    }
}

/// Build a record from prepared fields.
#[allow(dead_code)]
pub fn record_with(id: &str, fields: Vec<Field>) -> Record {
    Record {
        id: id.to_string(),
        fields,
    }
}

/// Build a single field.
#[allow(dead_code)]
pub fn field(name: &str, value: Value) -> Field {
    Field {
        name: name.to_string(),
        value,
    }
}

/// Engine over two record collections with the default configuration.
#[allow(dead_code)]
pub fn engine(
    side1: Vec<Record>,
    side2: Vec<Record>,
) -> DiffEngine<Record, Field, String, RecordAdapter> {
    DiffEngine::from_sets(side1, side2, RecordAdapter)
}
