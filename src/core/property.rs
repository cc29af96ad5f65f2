//! Typed object properties
//!
//! A scripted object declares its editable properties on the host object.
//! Each property has a name, a group (the property editor section), a
//! tooltip and a typed value. Only the kinds a screw part needs exist here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::units::Length;

/// Declared kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// One choice out of a fixed list
    Enumeration,
    /// A length in millimetres
    Length,
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::Enumeration => write!(f, "enumeration"),
            PropertyType::Length => write!(f, "length"),
        }
    }
}

/// Current value of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Enumeration {
        choices: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selected: Option<usize>,
    },
    Length { value: Length },
}

impl PropertyValue {
    /// Default value for a freshly declared property
    fn empty(kind: PropertyType) -> Self {
        match kind {
            PropertyType::Enumeration => PropertyValue::Enumeration {
                choices: Vec::new(),
                selected: None,
            },
            PropertyType::Length => PropertyValue::Length {
                value: Length::default(),
            },
        }
    }

    pub fn kind(&self) -> PropertyType {
        match self {
            PropertyValue::Enumeration { .. } => PropertyType::Enumeration,
            PropertyValue::Length { .. } => PropertyType::Length,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Enumeration { choices, selected } => {
                match selected.and_then(|i| choices.get(i)) {
                    Some(choice) => write!(f, "{}", choice),
                    None => write!(f, "-"),
                }
            }
            PropertyValue::Length { value } => write!(f, "{}", value),
        }
    }
}

/// A value assigned from outside, before it is checked against the
/// property's declared kind
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Replace an enumeration's choices; keeps the current selection if it
    /// is still offered, otherwise selects the first choice
    Choices(Vec<String>),
    /// Select an enumeration entry by name
    Choice(String),
    /// Set a length
    Length(Length),
}

impl From<Length> for Assignment {
    fn from(value: Length) -> Self {
        Assignment::Length(value)
    }
}

impl From<&str> for Assignment {
    fn from(value: &str) -> Self {
        Assignment::Choice(value.to_string())
    }
}

impl From<Vec<String>> for Assignment {
    fn from(choices: Vec<String>) -> Self {
        Assignment::Choices(choices)
    }
}

/// Errors from declaring or assigning properties
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("property '{0}' already exists")]
    AlreadyExists(String),

    #[error("no property named '{0}'")]
    NotFound(String),

    #[error("'{choice}' is not a valid {property} (choices: {choices})")]
    InvalidChoice {
        property: String,
        choice: String,
        choices: String,
    },

    #[error("cannot assign a {assigned} to {kind} property '{property}'")]
    TypeMismatch {
        property: String,
        kind: PropertyType,
        assigned: &'static str,
    },
}

/// One declared property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub group: String,
    pub doc: String,
    pub value: PropertyValue,
}

/// The properties of one document object, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    properties: Vec<Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property; returns it so the caller can assign a default
    pub fn add(
        &mut self,
        kind: PropertyType,
        name: &str,
        group: &str,
        doc: &str,
    ) -> Result<&mut Property, PropertyError> {
        if self.get(name).is_some() {
            return Err(PropertyError::AlreadyExists(name.to_string()));
        }
        self.properties.push(Property {
            name: name.to_string(),
            group: group.to_string(),
            doc: doc.to_string(),
            value: PropertyValue::empty(kind),
        });
        let last = self.properties.len() - 1;
        Ok(&mut self.properties[last])
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Assign a value, keeping the property's declared kind
    pub fn set(&mut self, name: &str, value: impl Into<Assignment>) -> Result<(), PropertyError> {
        let property = self
            .properties
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
        property.assign(value.into())
    }

    /// Selected entry of an enumeration property
    pub fn enumeration(&self, name: &str) -> Result<Option<&str>, PropertyError> {
        match self.get(name).map(|p| &p.value) {
            Some(PropertyValue::Enumeration { choices, selected }) => {
                Ok(selected.and_then(|i| choices.get(i)).map(String::as_str))
            }
            Some(other) => Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                kind: other.kind(),
                assigned: "enumeration read",
            }),
            None => Err(PropertyError::NotFound(name.to_string())),
        }
    }

    /// Value of a length property
    pub fn length(&self, name: &str) -> Result<Length, PropertyError> {
        match self.get(name).map(|p| &p.value) {
            Some(PropertyValue::Length { value }) => Ok(*value),
            Some(other) => Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                kind: other.kind(),
                assigned: "length read",
            }),
            None => Err(PropertyError::NotFound(name.to_string())),
        }
    }
}

impl Property {
    /// Assign a value, checking it against the declared kind
    pub fn assign(&mut self, assignment: Assignment) -> Result<(), PropertyError> {
        let mismatch = |kind: PropertyType, assigned: &'static str| PropertyError::TypeMismatch {
            property: self.name.clone(),
            kind,
            assigned,
        };

        match (&mut self.value, assignment) {
            (PropertyValue::Enumeration { choices, selected }, Assignment::Choices(new)) => {
                let keep = selected
                    .and_then(|i| choices.get(i))
                    .and_then(|current| new.iter().position(|c| c == current));
                *selected = keep.or(if new.is_empty() { None } else { Some(0) });
                *choices = new;
                Ok(())
            }
            (PropertyValue::Enumeration { choices, selected }, Assignment::Choice(choice)) => {
                match choices.iter().position(|c| *c == choice) {
                    Some(index) => {
                        *selected = Some(index);
                        Ok(())
                    }
                    None => Err(PropertyError::InvalidChoice {
                        property: self.name.clone(),
                        choice,
                        choices: choices.join(", "),
                    }),
                }
            }
            (PropertyValue::Length { value }, Assignment::Length(length)) => {
                *value = length;
                Ok(())
            }
            (value, Assignment::Length(_)) => Err(mismatch(value.kind(), "length")),
            (value, _) => Err(mismatch(value.kind(), "choice")),
        }
    }
}
