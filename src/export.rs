//! Per-method export: REST annotation, file naming and rendering.

use crate::code_samples::CodeSamples;
use crate::markdown::to_kebab_case;
use crate::method::Method;
use crate::registry::{Enum, Message};
use crate::renderer::Renderer;
use crate::rest_mapping::RestMapping;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a renderer needs to produce one method page.
///
/// The context is a snapshot: messages are copied out of the registry after
/// the method's REST mapping has been applied.
#[derive(Debug, Clone, Serialize)]
pub struct MethodContext {
    pub name: String,
    pub service: String,
    pub package: String,
    pub description: String,
    pub source: String,
    pub command_line: String,
    pub command_line_help: String,
    pub deprecated: bool,
    pub streaming_direction: String,
    pub request_streaming: bool,
    pub response_streaming: bool,
    pub has_rest_mapping: bool,
    pub rest_method: String,
    pub rest_path: String,
    pub request: Message,
    pub response: Message,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
    pub code_samples: CodeSamples,
}

impl MethodContext {
    /// Builds the context from a fully resolvable method.
    pub fn from_method(method: &Method) -> Result<Self> {
        let request = method.request()?.borrow().clone();
        let response = method.response()?.borrow().clone();
        let nested_messages = method
            .nested_messages()?
            .iter()
            .map(|m| m.borrow().clone())
            .collect();
        let nested_enums = method
            .nested_enums()?
            .iter()
            .map(|e| Enum::clone(e))
            .collect();
        let code_samples = CodeSamples::generate(method, &request)?;

        Ok(Self {
            name: method.name.clone(),
            service: method.service.clone(),
            package: method.package.clone(),
            description: method.description.clone(),
            source: method.source.clone(),
            command_line: method.command_line.clone(),
            command_line_help: method.command_line_help.clone(),
            deprecated: method.is_deprecated(),
            streaming_direction: method.streaming_direction().as_str().to_string(),
            request_streaming: method.request_type.streaming,
            response_streaming: method.response_type.streaming,
            has_rest_mapping: method.has_rest_mapping(),
            rest_method: method.rest_method().to_string(),
            rest_path: method.rest_path().to_string(),
            request,
            response,
            nested_messages,
            nested_enums,
            code_samples,
        })
    }
}

/// File name of a method's page: the kebab-cased method name plus the
/// renderer's extension.
pub fn artifact_file_name(method_name: &str, extension: &str) -> String {
    format!("{}.{}", to_kebab_case(method_name), extension)
}

/// Exports a single method into `service_dir`.
///
/// The method's REST mapping is applied to its request message right before
/// rendering, because the same request message may be shared with methods
/// mapped differently. Without a mapping the placements are reset instead.
/// Rendering errors are returned unchanged.
///
/// # Returns
///
/// The path of the written file.
pub fn export_method(method: &Method, service_dir: &Path, renderer: &dyn Renderer) -> Result<PathBuf> {
    let request = method.request()?;
    match method.rest_mapping.as_ref().filter(|_| method.has_rest_mapping()) {
        Some(mapping) => mapping.apply_to(&mut request.borrow_mut()),
        None => RestMapping::clear(&mut request.borrow_mut()),
    }

    let file_path = service_dir.join(artifact_file_name(&method.name, renderer.extension()));
    info!("Exporting method {} to {}", method.name, file_path.display());

    let context = MethodContext::from_method(method)
        .with_context(|| format!("Failed to resolve method {}", method.name))?;
    debug!(
        "Rendering {} with {} nested messages and {} nested enums",
        method.name,
        context.nested_messages.len(),
        context.nested_enums.len()
    );

    renderer.render(&context, &file_path)?;
    Ok(file_path)
}
