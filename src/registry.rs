//! Type registry - maps fully-qualified type names to their message or enum
//! definitions.
//!
//! The registry is built once from a [`DefinitionSet`] before any method is
//! resolved and is never modified afterwards. Messages are handed out as
//! shared handles: every method that references a message sees the same
//! instance, including any REST placement annotations applied to it.

use crate::definitions::{DefinitionSet, EnumDef, FieldDef, MessageDef};
use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared, annotatable message handle.
pub type SharedMessage = Rc<RefCell<Message>>;

/// A resolved registry entry.
#[derive(Debug, Clone)]
pub enum RegisteredType {
    Message(SharedMessage),
    Enum(Rc<Enum>),
}

/// A message definition with its fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name: String,
    pub full_name: String,
    pub description: String,
    /// Where the message was declared, as seen by the method that last
    /// resolved it.
    pub source: String,
    pub fields: Vec<Field>,
}

/// A single message field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub description: String,
    pub label: String,
    pub type_name: String,
    pub full_type: String,
    /// How the field travels over REST; only meaningful once a REST mapping
    /// has been applied to the owning message.
    pub rest_placement: RestPlacement,
}

/// Transport placement of a request field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestPlacement {
    #[default]
    Body,
    Path,
    Query,
}

/// An enum definition with its ordered values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub source: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i64,
    pub description: String,
}

/// Protobuf scalar types. Fields of these types reference nothing.
const SCALAR_TYPES: &[&str] = &[
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
];

impl Field {
    fn from_def(def: &FieldDef) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            label: def.label.clone(),
            type_name: def.type_name.clone(),
            full_type: def.full_type.clone(),
            rest_placement: RestPlacement::default(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        SCALAR_TYPES.contains(&self.type_name.as_str())
    }

    pub fn is_repeated(&self) -> bool {
        self.label == "repeated"
    }

    /// The fully-qualified name of the message or enum this field refers to,
    /// or `None` for scalar fields.
    pub fn type_reference(&self) -> Option<&str> {
        if self.is_scalar() || self.full_type.is_empty() {
            None
        } else {
            Some(&self.full_type)
        }
    }
}

impl Message {
    fn from_def(def: &MessageDef) -> Self {
        Self {
            name: def.name.clone(),
            full_name: def.full_name.clone(),
            description: def.description.clone(),
            source: def.source.clone(),
            fields: def.fields.iter().map(Field::from_def).collect(),
        }
    }
}

impl Enum {
    fn from_def(def: &EnumDef) -> Self {
        Self {
            name: def.name.clone(),
            full_name: def.full_name.clone(),
            description: def.description.clone(),
            source: def.source.clone(),
            values: def
                .values
                .iter()
                .map(|v| EnumValue {
                    name: v.name.clone(),
                    number: v.number,
                    description: v.description.clone(),
                })
                .collect(),
        }
    }
}

/// Read-only lookup from fully-qualified name to definition.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, RegisteredType>,
    message_count: usize,
    enum_count: usize,
}

impl TypeRegistry {
    /// Registers every message and enum of every package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateType`] if a full name is declared twice, whether
    /// as two messages, two enums, or one of each.
    pub fn build(definitions: &DefinitionSet) -> Result<Self> {
        let mut registry = Self::default();

        for package in &definitions.packages {
            debug!("Registering types of package {}", package.name);
            for def in &package.messages {
                registry.insert(
                    &def.full_name,
                    RegisteredType::Message(Rc::new(RefCell::new(Message::from_def(def)))),
                )?;
                registry.message_count += 1;
            }
            for def in &package.enums {
                registry.insert(&def.full_name, RegisteredType::Enum(Rc::new(Enum::from_def(def))))?;
                registry.enum_count += 1;
            }
        }

        debug!(
            "Type registry built with {} messages and {} enums",
            registry.message_count, registry.enum_count
        );
        Ok(registry)
    }

    fn insert(&mut self, full_name: &str, entry: RegisteredType) -> Result<()> {
        if self.types.contains_key(full_name) {
            return Err(Error::DuplicateType(full_name.to_string()));
        }
        self.types.insert(full_name.to_string(), entry);
        Ok(())
    }

    /// Looks up a type by fully-qualified name.
    pub fn resolve(&self, full_name: &str) -> Result<RegisteredType> {
        self.types
            .get(full_name)
            .cloned()
            .ok_or_else(|| Error::unknown_type(full_name))
    }

    pub fn resolve_message(&self, full_name: &str) -> Result<SharedMessage> {
        match self.resolve(full_name)? {
            RegisteredType::Message(message) => Ok(message),
            RegisteredType::Enum(_) => Err(Error::unexpected_kind(full_name, "a message")),
        }
    }

    pub fn resolve_enum(&self, full_name: &str) -> Result<Rc<Enum>> {
        match self.resolve(full_name)? {
            RegisteredType::Enum(enumeration) => Ok(enumeration),
            RegisteredType::Message(_) => Err(Error::unexpected_kind(full_name, "an enum")),
        }
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn enum_count(&self) -> usize {
        self.enum_count
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small builders for hand-written definition sets.

    use crate::definitions::{
        DefinitionSet, EnumDef, EnumValueDef, FieldDef, MessageDef, PackageDef,
    };

    pub fn field(name: &str, full_type: &str) -> FieldDef {
        let type_name = full_type.rsplit('.').next().unwrap_or(full_type);
        FieldDef {
            name: name.to_string(),
            type_name: type_name.to_string(),
            full_type: full_type.to_string(),
            ..Default::default()
        }
    }

    pub fn message(full_name: &str, fields: Vec<FieldDef>) -> MessageDef {
        MessageDef {
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            full_name: full_name.to_string(),
            fields,
            ..Default::default()
        }
    }

    pub fn enumeration(full_name: &str, values: &[(&str, i64)]) -> EnumDef {
        EnumDef {
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            full_name: full_name.to_string(),
            values: values
                .iter()
                .map(|(name, number)| EnumValueDef {
                    name: name.to_string(),
                    number: *number,
                    description: String::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn definitions(messages: Vec<MessageDef>, enums: Vec<EnumDef>) -> DefinitionSet {
        DefinitionSet {
            packages: vec![PackageDef {
                name: "lnrpc".to_string(),
                messages,
                enums,
                ..Default::default()
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_resolve_message_and_enum() {
        let defs = definitions(
            vec![message(
                "lnrpc.Channel",
                vec![field("capacity", "int64"), field("state", "lnrpc.ChannelState")],
            )],
            vec![enumeration("lnrpc.ChannelState", &[("OPEN", 0), ("CLOSED", 1)])],
        );
        let registry = TypeRegistry::build(&defs).unwrap();

        assert_eq!(registry.message_count(), 1);
        assert_eq!(registry.enum_count(), 1);

        let channel = registry.resolve_message("lnrpc.Channel").unwrap();
        assert_eq!(channel.borrow().fields.len(), 2);

        let state = registry.resolve_enum("lnrpc.ChannelState").unwrap();
        assert_eq!(state.values[1].name, "CLOSED");
        assert_eq!(state.values[1].number, 1);
    }

    #[test]
    fn test_resolve_unknown_type() {
        let registry = TypeRegistry::build(&definitions(vec![], vec![])).unwrap();

        let err = registry.resolve("lnrpc.Missing").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { ref type_name, method: None } if type_name == "lnrpc.Missing"
        ));
    }

    #[test]
    fn test_resolve_wrong_kind() {
        let defs = definitions(vec![], vec![enumeration("lnrpc.State", &[("A", 0)])]);
        let registry = TypeRegistry::build(&defs).unwrap();

        let err = registry.resolve_message("lnrpc.State").unwrap_err();
        assert!(matches!(err, Error::UnexpectedKind { .. }));
    }

    #[test]
    fn test_duplicate_across_kinds_rejected() {
        let defs = definitions(
            vec![message("lnrpc.Thing", vec![])],
            vec![enumeration("lnrpc.Thing", &[("A", 0)])],
        );

        let err = TypeRegistry::build(&defs).unwrap_err();
        assert!(matches!(err, Error::DuplicateType(ref name) if name == "lnrpc.Thing"));
    }

    #[test]
    fn test_messages_are_shared() {
        let defs = definitions(vec![message("lnrpc.Shared", vec![])], vec![]);
        let registry = TypeRegistry::build(&defs).unwrap();

        let first = registry.resolve_message("lnrpc.Shared").unwrap();
        let second = registry.resolve_message("lnrpc.Shared").unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        first.borrow_mut().source = "lightning.proto".to_string();
        assert_eq!(second.borrow().source, "lightning.proto");
    }

    #[test]
    fn test_scalar_fields_reference_nothing() {
        let scalar = Field::from_def(&field("amount", "uint64"));
        let nested = Field::from_def(&field("channel", "lnrpc.Channel"));

        assert!(scalar.is_scalar());
        assert_eq!(scalar.type_reference(), None);
        assert_eq!(nested.type_reference(), Some("lnrpc.Channel"));
    }
}
