//! RPC API docs - per-method documentation from RPC service definitions.
//!
//! This library turns a structured description of an RPC API (services,
//! methods, request and response messages, enums and REST mappings) into a
//! navigable model, then renders one documentation page per method.
//!
//! # Architecture
//!
//! 1. [`definitions`] - Loads raw definitions from JSON files (using [`scanner`] for directories)
//! 2. [`registry`] - Maps fully-qualified type names to message and enum definitions
//! 3. [`method`] - Methods with lazily resolved request, response and nested types
//! 4. [`nested`] - Walks the type reference graph from a message
//! 5. [`rest_mapping`] - Annotates request fields with their REST placement
//! 6. [`export`] - Applies the REST mapping and hands the method to a renderer
//!    together with its [`code_samples`]
//! 7. [`renderer`] / [`serializer`] - MDX, JSON and YAML output
//! 8. [`service`] - Groups methods by service and drives the export
//!
//! # Example Usage
//!
//! ```no_run
//! use rpc_api_docs::{
//!     definitions::load_definitions,
//!     renderer::MarkdownRenderer,
//!     service::ApiDocs,
//! };
//! use std::path::Path;
//!
//! let definitions = load_definitions(Path::new("lightning.json")).unwrap();
//! let docs = ApiDocs::from_definitions(&definitions).unwrap();
//!
//! let method = &docs.services[0].methods[0];
//! for message in method.nested_messages().unwrap() {
//!     println!("{}", message.borrow().full_name);
//! }
//!
//! let summary = docs.export(Path::new("docs"), &MarkdownRenderer).unwrap();
//! println!("Wrote {} files", summary.files.len());
//! ```

pub mod cli;
pub mod code_samples;
pub mod definitions;
pub mod error;
pub mod export;
pub mod markdown;
pub mod method;
pub mod nested;
pub mod registry;
pub mod renderer;
pub mod rest_mapping;
pub mod scanner;
pub mod serializer;
pub mod service;
