use std::path::PathBuf;

/// Result type alias for the documentation model
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the documentation model
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    ParseError { file: PathBuf, message: String },
    /// A referenced type is not registered. `method` names the method whose
    /// resolution hit the missing type, when known.
    UnknownType { type_name: String, method: Option<String> },
    /// A type resolved to an enum where a message was required, or the
    /// reverse.
    UnexpectedKind {
        type_name: String,
        expected: &'static str,
        method: Option<String>,
    },
    DuplicateType(String),
    InvalidArgument(String),
}

impl Error {
    pub fn unknown_type(type_name: &str) -> Self {
        Error::UnknownType {
            type_name: type_name.to_string(),
            method: None,
        }
    }

    pub fn unexpected_kind(type_name: &str, expected: &'static str) -> Self {
        Error::UnexpectedKind {
            type_name: type_name.to_string(),
            expected,
            method: None,
        }
    }

    /// Attach the requesting method to a type resolution error. Other errors,
    /// and errors that already name a method, pass through untouched.
    pub fn in_method(self, method_name: &str) -> Self {
        match self {
            Error::UnknownType {
                type_name,
                method: None,
            } => Error::UnknownType {
                type_name,
                method: Some(method_name.to_string()),
            },
            Error::UnexpectedKind {
                type_name,
                expected,
                method: None,
            } => Error::UnexpectedKind {
                type_name,
                expected,
                method: Some(method_name.to_string()),
            },
            other => other,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::ParseError { file, message } => {
                write!(f, "failed to parse {}: {}", file.display(), message)
            }
            Error::UnknownType {
                type_name,
                method: Some(method),
            } => write!(f, "unknown type {} referenced by method {}", type_name, method),
            Error::UnknownType {
                type_name,
                method: None,
            } => write!(f, "unknown type {}", type_name),
            Error::UnexpectedKind {
                type_name,
                expected,
                method: Some(method),
            } => write!(
                f,
                "type {} referenced by method {} is not {}",
                type_name, method, expected
            ),
            Error::UnexpectedKind {
                type_name,
                expected,
                method: None,
            } => write!(f, "type {} is not {}", type_name, expected),
            Error::DuplicateType(name) => write!(f, "type {} is declared more than once", name),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_method_attaches_method_name() {
        let err = Error::unknown_type("lnrpc.Missing").in_method("OpenChannel");
        assert_eq!(
            err.to_string(),
            "unknown type lnrpc.Missing referenced by method OpenChannel"
        );
    }

    #[test]
    fn test_in_method_keeps_first_method() {
        let err = Error::unknown_type("lnrpc.Missing")
            .in_method("OpenChannel")
            .in_method("CloseChannel");
        assert!(err.to_string().ends_with("OpenChannel"));
    }

    #[test]
    fn test_in_method_names_wrong_kind_lookup() {
        let err = Error::unexpected_kind("lnrpc.Initiator", "a message").in_method("OpenChannel");
        assert!(matches!(
            err,
            Error::UnexpectedKind { method: Some(ref name), .. } if name == "OpenChannel"
        ));
        assert_eq!(
            err.to_string(),
            "type lnrpc.Initiator referenced by method OpenChannel is not a message"
        );
    }

    #[test]
    fn test_in_method_ignores_other_errors() {
        let err = Error::DuplicateType("lnrpc.Dup".to_string()).in_method("OpenChannel");
        assert_eq!(err.to_string(), "type lnrpc.Dup is declared more than once");
    }
}
