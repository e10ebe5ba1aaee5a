use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::object::ScriptObject;

pub type ObjectHandle = Rc<dyn ScriptObject>;

/// A fully materialized script value. Arguments are always values, never thunks.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectHandle),
}

impl Value {
    /// Replaces an object reference with the object's current value.
    pub fn resolved(&self) -> Value {
        match self {
            Self::Object(object) => match object.value() {
                Self::Object(_) => Self::Null,
                value => value,
            },
            other => other.clone(),
        }
    }

    /// Numeric coercion: numeric strings parse, booleans map to 1/0.
    pub fn to_number(&self) -> Option<f64> {
        match self.resolved() {
            Self::Number(value) => Some(value),
            Self::Bool(value) => Some(if value { 1.0 } else { 0.0 }),
            Self::String(value) => value.trim().parse::<f64>().ok(),
            Self::Null | Self::Object(_) => None,
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self.resolved() {
            Self::Bool(value) => Some(value),
            Self::Number(value) => Some(value != 0.0),
            Self::String(value) => match value.as_str() {
                "TRUE" | "true" => Some(true),
                "FALSE" | "false" => Some(false),
                _ => None,
            },
            Self::Null | Self::Object(_) => None,
        }
    }

    /// Canonical text used to match parametrized callback keys.
    pub fn to_key(&self) -> String {
        match self {
            Self::Object(object) => object.name().to_string(),
            other => other.to_text(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::Number(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::Object(_) => self.resolved().to_text(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Self::String(value) => f.debug_tuple("String").field(value).finish(),
            Self::Object(object) => write!(f, "Object({} {})", object.kind(), object.name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Object(object) => serializer.serialize_str(object.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjectHandle> for Value {
    fn from(value: ObjectHandle) -> Self {
        Self::Object(value)
    }
}
