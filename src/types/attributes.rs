use serde::{Deserialize, Serialize};

use crate::constants::attr_types;

/// Typed value of a band attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeValue {
    Varchar(String),
    Float32(f32),
    Int32(i32),
    Bool(bool),
}

impl AttributeValue {
    pub fn type_tag(&self) -> u16 {
        match self {
            AttributeValue::Float32(_) => attr_types::FLOAT32,
            AttributeValue::Int32(_) => attr_types::INT32,
            AttributeValue::Varchar(_) => attr_types::VARCHAR,
            AttributeValue::Bool(_) => attr_types::BOOL,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let AttributeValue::Varchar(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        if let AttributeValue::Float32(f) = self {
            Some(*f)
        } else {
            None
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        if let AttributeValue::Int32(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let AttributeValue::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Varchar(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Varchar(s)
    }
}

impl From<f32> for AttributeValue {
    fn from(f: f32) -> Self {
        AttributeValue::Float32(f)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Int32(i)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeField {
    pub name: String,
    pub value: AttributeValue,
}

/// Ordered list of named band attributes. Names are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord(pub Vec<AttributeField>);

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.push(AttributeField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn fields(&self) -> &[AttributeField] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
