//! Rendering of method contexts into documentation files.
//!
//! A [`Renderer`] turns one [`MethodContext`] into one file. Three renderers
//! are provided:
//!
//! - [`MarkdownRenderer`] writes an MDX page meant for a documentation site
//! - [`JsonRenderer`] and [`YamlRenderer`] dump the context itself, which is
//!   handy for feeding other tools

use crate::code_samples::CodeSamples;
use crate::export::MethodContext;
use crate::markdown::{clean_description, escape_mdx};
use crate::registry::{Enum, Field, Message, RestPlacement};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use std::fmt::Write;
use std::path::Path;

/// Produces a documentation file from a method context.
pub trait Renderer {
    /// File extension (without the dot) of the files this renderer writes.
    fn extension(&self) -> &'static str;

    /// Renders `context` to the file at `path`.
    fn render(&self, context: &MethodContext, path: &Path) -> Result<()>;
}

pub struct MarkdownRenderer;

pub struct JsonRenderer;

pub struct YamlRenderer;

impl Renderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "mdx"
    }

    fn render(&self, context: &MethodContext, path: &Path) -> Result<()> {
        let page = render_markdown(context)?;
        write_to_file(&page, path)
    }
}

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, context: &MethodContext, path: &Path) -> Result<()> {
        write_to_file(&serialize_json(context)?, path)
    }
}

impl Renderer for YamlRenderer {
    fn extension(&self) -> &'static str {
        "yaml"
    }

    fn render(&self, context: &MethodContext, path: &Path) -> Result<()> {
        write_to_file(&serialize_yaml(context)?, path)
    }
}

/// Builds the MDX page for a method.
pub fn render_markdown(context: &MethodContext) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "---")?;
    writeln!(out, "title: \"{}\"", context.name)?;
    writeln!(out, "description: \"{}.{}\"", context.service, context.name)?;
    writeln!(out, "---")?;
    writeln!(out)?;
    if !context.code_samples.is_empty() {
        writeln!(out, "import Tabs from '@theme/Tabs';")?;
        writeln!(out, "import TabItem from '@theme/TabItem';")?;
        writeln!(out)?;
    }
    writeln!(out, "# {}", context.name)?;
    writeln!(out)?;

    if context.deprecated {
        writeln!(out, ":::warning\n\nThis method is deprecated.\n\n:::")?;
        writeln!(out)?;
    }
    if !context.streaming_direction.is_empty() {
        writeln!(out, "**Streaming:** {}", context.streaming_direction)?;
        writeln!(out)?;
    }

    let description = clean_description(&context.description);
    if !description.is_empty() {
        writeln!(out, "{}", escape_mdx(&description))?;
        writeln!(out)?;
    }

    writeln!(out, "Source: `{}`", context.source)?;
    writeln!(out)?;

    if !context.command_line.is_empty() {
        writeln!(out, "## CLI")?;
        writeln!(out)?;
        writeln!(out, "```shell\n$ {}\n```", context.command_line)?;
        writeln!(out)?;
        if !context.command_line_help.is_empty() {
            writeln!(out, "```text\n{}\n```", context.command_line_help)?;
            writeln!(out)?;
        }
    }

    if context.has_rest_mapping {
        writeln!(out, "## REST")?;
        writeln!(out)?;
        writeln!(out, "`{} {}`", context.rest_method, context.rest_path)?;
        writeln!(out)?;
    }

    if !context.code_samples.is_empty() {
        writeln!(out, "## Code Samples")?;
        writeln!(out)?;
        write_code_samples(&mut out, &context.code_samples)?;
    }

    writeln!(out, "## Request")?;
    writeln!(out)?;
    write_message(&mut out, &context.request, context.has_rest_mapping)?;

    writeln!(out, "## Response")?;
    writeln!(out)?;
    write_message(&mut out, &context.response, false)?;

    if !context.nested_messages.is_empty() {
        writeln!(out, "## Nested Messages")?;
        writeln!(out)?;
        for message in &context.nested_messages {
            writeln!(out, "### {}", message.full_name)?;
            writeln!(out)?;
            write_message(&mut out, message, false)?;
        }
    }

    if !context.nested_enums.is_empty() {
        writeln!(out, "## Enums")?;
        writeln!(out)?;
        for enumeration in &context.nested_enums {
            write_enum(&mut out, enumeration)?;
        }
    }

    Ok(out)
}

fn write_code_samples(out: &mut String, samples: &CodeSamples) -> std::fmt::Result {
    let mut tabs = vec![
        ("grpc-js", "gRPC (JavaScript)", "js", samples.grpc_js.as_str()),
        ("grpc-py", "gRPC (Python)", "python", samples.grpc_py.as_str()),
    ];
    if let Some(code) = &samples.rest_js {
        tabs.push(("rest-js", "REST (JavaScript)", "js", code.as_str()));
    }
    if let Some(code) = &samples.rest_py {
        tabs.push(("rest-py", "REST (Python)", "python", code.as_str()));
    }

    writeln!(out, "<Tabs>")?;
    for (value, label, language, code) in tabs {
        writeln!(out, "<TabItem value=\"{}\" label=\"{}\">", value, label)?;
        writeln!(out)?;
        writeln!(out, "```{}", language)?;
        write!(out, "{}", code)?;
        if !code.ends_with('\n') {
            writeln!(out)?;
        }
        writeln!(out, "```")?;
        writeln!(out)?;
        writeln!(out, "</TabItem>")?;
    }
    writeln!(out, "</Tabs>")?;
    writeln!(out)
}

fn write_message(out: &mut String, message: &Message, with_placement: bool) -> std::fmt::Result {
    writeln!(out, "**{}** (`{}`)", message.full_name, message.source)?;
    writeln!(out)?;

    if message.fields.is_empty() {
        writeln!(out, "This message has no parameters.")?;
        writeln!(out)?;
        return Ok(());
    }

    if with_placement {
        writeln!(out, "| Field | Type | Placement | Description |")?;
        writeln!(out, "| ----- | ---- | --------- | ----------- |")?;
    } else {
        writeln!(out, "| Field | Type | Description |")?;
        writeln!(out, "| ----- | ---- | ----------- |")?;
    }

    for field in &message.fields {
        let placement = if with_placement {
            format!(" {} |", placement_label(field))
        } else {
            String::new()
        };
        writeln!(
            out,
            "| `{}` | {} |{} {} |",
            field.name,
            type_label(field),
            placement,
            table_cell(&field.description)
        )?;
    }
    writeln!(out)
}

fn write_enum(out: &mut String, enumeration: &Enum) -> std::fmt::Result {
    writeln!(out, "### {}", enumeration.full_name)?;
    writeln!(out)?;
    let description = clean_description(&enumeration.description);
    if !description.is_empty() {
        writeln!(out, "{}", escape_mdx(&description))?;
        writeln!(out)?;
    }
    writeln!(out, "| Name | Number | Description |")?;
    writeln!(out, "| ---- | ------ | ----------- |")?;
    for value in &enumeration.values {
        writeln!(
            out,
            "| `{}` | {} | {} |",
            value.name,
            value.number,
            table_cell(&value.description)
        )?;
    }
    writeln!(out)
}

fn type_label(field: &Field) -> String {
    let base = if field.is_scalar() {
        format!("`{}`", field.type_name)
    } else {
        format!("`{}`", field.full_type)
    };
    if field.is_repeated() {
        format!("{}[]", base)
    } else {
        base
    }
}

fn placement_label(field: &Field) -> &'static str {
    match field.rest_placement {
        RestPlacement::Body => "body",
        RestPlacement::Path => "path",
        RestPlacement::Query => "query",
    }
}

/// Flattens text into a single markdown table cell.
fn table_cell(text: &str) -> String {
    escape_mdx(&clean_description(text))
        .replace('\n', " ")
        .replace('|', "\\|")
}
