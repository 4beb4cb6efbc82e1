//! Transitive discovery of the messages and enums reachable from a message.

use crate::error::Result;
use crate::registry::{Enum, RegisteredType, SharedMessage, TypeRegistry};
use log::debug;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Maximum number of reference hops followed from the starting message.
pub const MAX_NESTED_DEPTH: usize = 10;

/// Types discovered by a walk, keyed by full name.
///
/// The maps double as the visited set: a type present here is never walked
/// again, which is what breaks reference cycles.
#[derive(Debug, Default)]
pub struct NestedTypes {
    pub messages: BTreeMap<String, SharedMessage>,
    pub enums: BTreeMap<String, Rc<Enum>>,
}

/// Walks the field reference graph of a message.
pub struct NestedTypeResolver<'a> {
    registry: &'a TypeRegistry,
    max_depth: usize,
}

impl<'a> NestedTypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            max_depth: MAX_NESTED_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Collects every message and enum reachable from `root` into `found`.
    ///
    /// The graph is walked breadth-first, so every message is expanded at its
    /// shortest distance from `root` and the depth cut-off does not depend on
    /// field order. The root itself is only recorded if one of the reachable
    /// messages (or the root) refers back to it. Messages at the maximum depth
    /// are recorded but not expanded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::UnknownType`] if a field refers to a type
    /// that is not registered.
    pub fn collect(&self, root: &SharedMessage, found: &mut NestedTypes) -> Result<()> {
        debug!("Collecting nested types of {}", root.borrow().full_name);

        let mut queue = VecDeque::from([(Rc::clone(root), self.max_depth)]);
        while let Some((message, depth)) = queue.pop_front() {
            if depth == 0 {
                debug!(
                    "Maximum nesting depth reached at {}, not descending further",
                    message.borrow().full_name
                );
                continue;
            }

            let references: Vec<String> = message
                .borrow()
                .fields
                .iter()
                .filter_map(|f| f.type_reference().map(str::to_string))
                .collect();

            for full_type in references {
                if found.messages.contains_key(&full_type) || found.enums.contains_key(&full_type) {
                    continue;
                }

                match self.registry.resolve(&full_type)? {
                    RegisteredType::Message(nested) => {
                        found.messages.insert(full_type, Rc::clone(&nested));
                        queue.push_back((nested, depth - 1));
                    }
                    RegisteredType::Enum(nested) => {
                        found.enums.insert(full_type, nested);
                    }
                }
            }
        }

        Ok(())
    }
}

impl NestedTypes {
    /// Adds all entries of `other` not already present.
    pub fn merge(&mut self, other: NestedTypes) {
        for (name, message) in other.messages {
            self.messages.entry(name).or_insert(message);
        }
        for (name, enumeration) in other.enums {
            self.enums.entry(name).or_insert(enumeration);
        }
    }

    /// Messages ordered case-insensitively by full name.
    pub fn sorted_messages(&self) -> Vec<SharedMessage> {
        let mut messages: Vec<SharedMessage> = self.messages.values().cloned().collect();
        messages.sort_by_cached_key(|m| m.borrow().full_name.to_lowercase());
        messages
    }

    /// Enums ordered case-insensitively by full name.
    pub fn sorted_enums(&self) -> Vec<Rc<Enum>> {
        let mut enums: Vec<Rc<Enum>> = self.enums.values().cloned().collect();
        enums.sort_by_cached_key(|e| e.full_name.to_lowercase());
        enums
    }
}
