//! Serialization of method contexts to YAML or JSON, and file output.

use crate::export::MethodContext;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a method context to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(context: &MethodContext) -> Result<String> {
    debug!("Serializing method {} to YAML", context.name);
    serde_yaml::to_string(context)
        .with_context(|| format!("Failed to serialize method {} to YAML", context.name))
}

/// Serializes a method context to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(context: &MethodContext) -> Result<String> {
    debug!("Serializing method {} to JSON", context.name);
    serde_json::to_string_pretty(context)
        .with_context(|| format!("Failed to serialize method {} to JSON", context.name))
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Missing
/// parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::code_samples::CodeSamples;
    use crate::export::MethodContext;
    use crate::registry::{Enum, EnumValue, Field, Message, RestPlacement};

    fn field(name: &str, type_name: &str, full_type: &str, placement: RestPlacement) -> Field {
        Field {
            name: name.to_string(),
            description: format!("The {} field.", name),
            label: String::new(),
            type_name: type_name.to_string(),
            full_type: full_type.to_string(),
            rest_placement: placement,
        }
    }

    /// A hand-built context for `CloseChannel`.
    pub fn close_channel_context() -> MethodContext {
        MethodContext {
            name: "CloseChannel".to_string(),
            service: "Lightning".to_string(),
            package: "lnrpc".to_string(),
            description: "CloseChannel attempts to close an active channel.".to_string(),
            source: "lightning.proto".to_string(),
            command_line: "lncli closechannel".to_string(),
            command_line_help: "Close an existing channel.".to_string(),
            deprecated: false,
            streaming_direction: "server".to_string(),
            request_streaming: false,
            response_streaming: true,
            has_rest_mapping: true,
            rest_method: "DELETE".to_string(),
            rest_path: "/v1/channels/{channel_point.funding_txid_str}".to_string(),
            request: Message {
                name: "CloseChannelRequest".to_string(),
                full_name: "lnrpc.CloseChannelRequest".to_string(),
                description: String::new(),
                source: "lightning.proto".to_string(),
                fields: vec![
                    field(
                        "channel_point",
                        "ChannelPoint",
                        "lnrpc.ChannelPoint",
                        RestPlacement::Path,
                    ),
                    field("force", "bool", "bool", RestPlacement::Query),
                ],
            },
            response: Message {
                name: "CloseStatusUpdate".to_string(),
                full_name: "lnrpc.CloseStatusUpdate".to_string(),
                description: String::new(),
                source: "lightning.proto".to_string(),
                fields: vec![field(
                    "close_pending",
                    "PendingUpdate",
                    "lnrpc.PendingUpdate",
                    RestPlacement::Body,
                )],
            },
            nested_messages: vec![Message {
                name: "ChannelPoint".to_string(),
                full_name: "lnrpc.ChannelPoint".to_string(),
                description: "A channel outpoint.".to_string(),
                source: "lightning.proto".to_string(),
                fields: vec![field("output_index", "uint32", "uint32", RestPlacement::Body)],
            }],
            nested_enums: vec![Enum {
                name: "Initiator".to_string(),
                full_name: "lnrpc.Initiator".to_string(),
                description: String::new(),
                source: "lightning.proto".to_string(),
                values: vec![
                    EnumValue {
                        name: "INITIATOR_UNKNOWN".to_string(),
                        number: 0,
                        description: String::new(),
                    },
                    EnumValue {
                        name: "INITIATOR_LOCAL".to_string(),
                        number: 1,
                        description: String::new(),
                    },
                ],
            }],
            code_samples: CodeSamples {
                grpc_js: "let call = client.closeChannel(request);\n".to_string(),
                grpc_py: "for response in stub.CloseChannel(request):\n    print(response)\n"
                    .to_string(),
                rest_js: Some("request.delete(options);\n".to_string()),
                rest_py: Some("r = requests.delete(url, params=params)\n".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::close_channel_context;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&close_channel_context()).unwrap();

        assert!(yaml.contains("name: CloseChannel"));
        assert!(yaml.contains("rest_method: DELETE"));
        assert!(yaml.contains("rest_placement: path"));
        assert!(yaml.contains("INITIATOR_LOCAL"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&close_channel_context()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["name"], "CloseChannel");
        assert_eq!(parsed["streaming_direction"], "server");
        assert_eq!(parsed["request"]["fields"][1]["rest_placement"], "query");
        assert_eq!(parsed["nested_enums"][0]["values"][1]["number"], 1);
        assert_eq!(
            parsed["code_samples"]["rest_js"],
            "request.delete(options);\n"
        );
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let json = serialize_json(&close_channel_context()).unwrap();

        assert!(json.contains('\n'));
        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("lnrpc").join("lightning").join("x.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("x.json");

        write_to_file("first", &file_path).unwrap();
        write_to_file("second", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }
}
