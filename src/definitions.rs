//! Raw API definitions as supplied by the definition source.
//!
//! The definition source emits one JSON document per daemon (or per proto
//! bundle). Each document lists packages, and each package carries its
//! services, messages and enums. Nothing here is resolved yet: type
//! references are plain fully-qualified names.

use crate::error::{Error, Result};
use crate::scanner::FileScanner;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A complete set of definitions, possibly merged from several files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionSet {
    #[serde(default)]
    pub packages: Vec<PackageDef>,
}

/// One proto package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageDef {
    pub name: String,
    pub services: Vec<ServiceDef>,
    pub messages: Vec<MessageDef>,
    pub enums: Vec<EnumDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDef {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub source: String,
    pub methods: Vec<MethodDef>,
}

/// A single RPC as declared in the definition source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MethodDef {
    pub name: String,
    pub description: String,
    pub source: String,
    pub command_line: String,
    pub command_line_help: String,
    pub request_type: String,
    pub request_full_type: String,
    pub request_type_source: String,
    pub request_streaming: bool,
    pub response_type: String,
    pub response_full_type: String,
    pub response_type_source: String,
    pub response_streaming: bool,
    pub rest_mappings: Vec<RestMappingDef>,
}

/// HTTP binding declared for a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RestMappingDef {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageDef {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub source: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDef {
    pub name: String,
    pub description: String,
    /// `repeated`, `optional` or empty
    pub label: String,
    /// Short type name, or the scalar name for scalar fields
    #[serde(rename = "type")]
    pub type_name: String,
    /// Fully-qualified name of the referenced message or enum
    pub full_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumDef {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub source: String,
    pub values: Vec<EnumValueDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i64,
    pub description: String,
}

impl DefinitionSet {
    /// Parses a definition document from a JSON string.
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Appends all packages of `other`.
    pub fn merge(&mut self, other: DefinitionSet) {
        self.packages.extend(other.packages);
    }

    pub fn method_count(&self) -> usize {
        self.packages
            .iter()
            .flat_map(|p| &p.services)
            .map(|s| s.methods.len())
            .sum()
    }
}

/// Loads a single definition file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid definition
/// document.
pub fn load_definitions(path: &Path) -> Result<DefinitionSet> {
    debug!("Loading definitions from {}", path.display());

    let content = fs::read_to_string(path)?;
    let set = DefinitionSet::from_json(&content).map_err(|e| Error::ParseError {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(
        "Loaded {} packages from {}",
        set.packages.len(),
        path.display()
    );
    Ok(set)
}

/// Loads every definition file found under `dir` and merges them in path
/// order.
///
/// Unlike a single-file load, a directory without any definition file is an
/// error: there would be nothing to document.
pub fn load_definition_dir(dir: &Path) -> Result<DefinitionSet> {
    let scan_result = FileScanner::new(dir.to_path_buf())
        .scan()
        .map_err(|e| Error::InvalidArgument(e.to_string()))?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    if scan_result.definition_files.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "no definition files found in {}",
            dir.display()
        )));
    }

    let mut set = DefinitionSet::default();
    for path in &scan_result.definition_files {
        set.merge(load_definitions(path)?);
    }
    Ok(set)
}

/// Loads definitions from either a file or a directory.
pub fn load_path(path: &Path) -> Result<DefinitionSet> {
    if path.is_dir() {
        load_definition_dir(path)
    } else {
        load_definitions(path)
    }
}
