//! Serde helpers for event codes and types in config files
//!
//! Codes serialize as their canonical name (`"BTN_SOUTH"`) and accept a name,
//! a `"TYPE:number"` literal (`"KEY:0x13f"`) or a `{ type = "KEY", code = 319 }`
//! table. Types serialize as their prefix (`"ABS"`) and accept a name or a
//! number. Use with `#[serde(serialize_with, deserialize_with)]`.

use crate::codes;
use crate::error::CodeError;
use crate::event::{EventId, EventType};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    /// `"BTN_SOUTH"` or `"KEY:0x13f"`
    Name(String),
    /// `{ type = "KEY", code = 319 }`
    Numbered {
        #[serde(rename = "type")]
        event_type: TypeRepr,
        code: u16,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRepr {
    Name(String),
    Number(u16),
}

impl TypeRepr {
    fn resolve(self) -> Result<EventType, CodeError> {
        match self {
            TypeRepr::Name(name) => codes::parse_type(&name),
            TypeRepr::Number(n) => Ok(EventType(n)),
        }
    }
}

impl CodeRepr {
    fn resolve(self) -> Result<EventId, CodeError> {
        match self {
            CodeRepr::Name(name) => codes::parse(&name),
            CodeRepr::Numbered { event_type, code } => Ok(EventId::new(event_type.resolve()?, code)),
        }
    }
}

pub fn serialize_code<S: Serializer>(id: &EventId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&id.to_string())
}

pub fn deserialize_code<'de, D: Deserializer<'de>>(d: D) -> Result<EventId, D::Error> {
    CodeRepr::deserialize(d)?
        .resolve()
        .map_err(serde::de::Error::custom)
}

pub fn serialize_opt_code<S: Serializer>(id: &Option<EventId>, s: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => s.serialize_some(&id.to_string()),
        None => s.serialize_none(),
    }
}

pub fn deserialize_opt_code<'de, D: Deserializer<'de>>(d: D) -> Result<Option<EventId>, D::Error> {
    Option::<CodeRepr>::deserialize(d)?
        .map(CodeRepr::resolve)
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Known types as their prefix, others as a number
pub fn serialize_type<S: Serializer>(t: &EventType, s: S) -> Result<S::Ok, S::Error> {
    match t.prefix() {
        "EV" => s.serialize_u16(t.0),
        prefix => s.serialize_str(prefix),
    }
}

pub fn deserialize_type<'de, D: Deserializer<'de>>(d: D) -> Result<EventType, D::Error> {
    TypeRepr::deserialize(d)?
        .resolve()
        .map_err(serde::de::Error::custom)
}
