//! RPC methods and their lazily resolved type views.

use crate::definitions::MethodDef;
use crate::error::Result;
use crate::markdown::{clean_description, strip_command_line};
use crate::nested::{NestedTypeResolver, NestedTypes};
use crate::registry::{Enum, SharedMessage, TypeRegistry};
use crate::rest_mapping::RestMapping;
use log::debug;
use std::cell::OnceCell;
use std::rc::Rc;

/// Streaming mode of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingDirection {
    Bidirectional,
    Server,
    Client,
    Unary,
}

impl StreamingDirection {
    /// Label used in rendered output; empty for unary methods.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamingDirection::Bidirectional => "bidirectional",
            StreamingDirection::Server => "server",
            StreamingDirection::Client => "client",
            StreamingDirection::Unary => "",
        }
    }
}

/// One side (request or response) of a method signature.
#[derive(Debug, Clone, Default)]
pub struct TypeRef {
    pub name: String,
    pub full_name: String,
    /// File in which the method's view of this type was declared
    pub source: String,
    pub streaming: bool,
}

/// A single RPC operation.
///
/// Resolved messages and nested type lists are computed on first access and
/// cached for the lifetime of the method.
#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub service: String,
    pub package: String,
    pub description: String,
    pub source: String,
    pub command_line: String,
    pub command_line_help: String,
    pub request_type: TypeRef,
    pub response_type: TypeRef,
    pub rest_mapping: Option<RestMapping>,

    registry: Rc<TypeRegistry>,
    request: OnceCell<SharedMessage>,
    response: OnceCell<SharedMessage>,
    nested: OnceCell<NestedLists>,
}

#[derive(Debug)]
struct NestedLists {
    messages: Vec<SharedMessage>,
    enums: Vec<Rc<Enum>>,
}

impl Method {
    /// Builds a method from its definition.
    ///
    /// Only the first declared REST mapping is kept.
    pub fn new(def: &MethodDef, service: &str, package: &str, registry: Rc<TypeRegistry>) -> Self {
        if def.rest_mappings.len() > 1 {
            debug!(
                "Method {} declares {} REST mappings, using the first",
                def.name,
                def.rest_mappings.len()
            );
        }

        Self {
            name: def.name.clone(),
            service: service.to_string(),
            package: package.to_string(),
            description: strip_command_line(&def.description),
            source: def.source.clone(),
            command_line: def.command_line.clone(),
            command_line_help: clean_description(&def.command_line_help),
            request_type: TypeRef {
                name: def.request_type.clone(),
                full_name: def.request_full_type.clone(),
                source: def.request_type_source.clone(),
                streaming: def.request_streaming,
            },
            response_type: TypeRef {
                name: def.response_type.clone(),
                full_name: def.response_full_type.clone(),
                source: def.response_type_source.clone(),
                streaming: def.response_streaming,
            },
            rest_mapping: def.rest_mappings.first().map(RestMapping::new),
            registry,
            request: OnceCell::new(),
            response: OnceCell::new(),
            nested: OnceCell::new(),
        }
    }

    /// The resolved request message.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::Error::UnknownType`] naming this method if the
    /// request type is not registered.
    pub fn request(&self) -> Result<SharedMessage> {
        self.resolve_side(&self.request, &self.request_type)
    }

    /// The resolved response message.
    pub fn response(&self) -> Result<SharedMessage> {
        self.resolve_side(&self.response, &self.response_type)
    }

    fn resolve_side(&self, slot: &OnceCell<SharedMessage>, type_ref: &TypeRef) -> Result<SharedMessage> {
        if let Some(message) = slot.get() {
            return Ok(Rc::clone(message));
        }

        let message = self
            .registry
            .resolve_message(&type_ref.full_name)
            .map_err(|e| e.in_method(&self.name))?;
        message.borrow_mut().source = type_ref.source.clone();

        Ok(Rc::clone(slot.get_or_init(|| message)))
    }

    /// Every message reachable from the request or response, without
    /// duplicates, ordered case-insensitively by full name.
    pub fn nested_messages(&self) -> Result<&[SharedMessage]> {
        Ok(&self.nested()?.messages)
    }

    /// Every enum reachable from the request or response, ordered like
    /// [`Method::nested_messages`].
    pub fn nested_enums(&self) -> Result<&[Rc<Enum>]> {
        Ok(&self.nested()?.enums)
    }

    fn nested(&self) -> Result<&NestedLists> {
        if let Some(lists) = self.nested.get() {
            return Ok(lists);
        }
        let found = self.collect_nested()?;
        let lists = NestedLists {
            messages: found.sorted_messages(),
            enums: found.sorted_enums(),
        };
        debug!(
            "Method {} has {} nested messages and {} nested enums",
            self.name,
            lists.messages.len(),
            lists.enums.len()
        );
        Ok(self.nested.get_or_init(|| lists))
    }

    fn collect_nested(&self) -> Result<NestedTypes> {
        let resolver = NestedTypeResolver::new(&self.registry);

        let mut from_request = NestedTypes::default();
        resolver
            .collect(&self.request()?, &mut from_request)
            .map_err(|e| e.in_method(&self.name))?;

        let mut from_response = NestedTypes::default();
        resolver
            .collect(&self.response()?, &mut from_response)
            .map_err(|e| e.in_method(&self.name))?;

        from_request.merge(from_response);
        Ok(from_request)
    }

    pub fn has_nested_messages(&self) -> Result<bool> {
        Ok(!self.nested_messages()?.is_empty())
    }

    pub fn has_nested_enums(&self) -> Result<bool> {
        Ok(!self.nested_enums()?.is_empty())
    }

    /// Whether the description mentions deprecation, in any letter case.
    pub fn is_deprecated(&self) -> bool {
        self.description.to_lowercase().contains("deprecated")
    }

    pub fn streaming_direction(&self) -> StreamingDirection {
        match (self.request_type.streaming, self.response_type.streaming) {
            (true, true) => StreamingDirection::Bidirectional,
            (false, true) => StreamingDirection::Server,
            (true, false) => StreamingDirection::Client,
            (false, false) => StreamingDirection::Unary,
        }
    }

    pub fn has_rest_mapping(&self) -> bool {
        RestMapping::is_present(self.rest_mapping.as_ref())
    }

    /// HTTP verb of the REST mapping, or empty when there is none.
    pub fn rest_method(&self) -> &str {
        match &self.rest_mapping {
            Some(mapping) if self.has_rest_mapping() => &mapping.method,
            _ => "",
        }
    }

    /// URL template of the REST mapping, or empty when there is none.
    pub fn rest_path(&self) -> &str {
        match &self.rest_mapping {
            Some(mapping) if self.has_rest_mapping() => &mapping.path,
            _ => "",
        }
    }
}
