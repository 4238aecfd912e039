//! Loader errors for query property files and dashboard documents

use std::fmt;

/// Errors raised by the `parser` loaders
#[derive(Debug)]
pub enum ParseError {
    /// A query or dashboard file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Query properties YAML did not match the expected shape
    Yaml {
        source: serde_yaml::Error,
    },
    /// Dashboard JSON did not parse or could not be written back
    Json {
        source: serde_json::Error,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } if path.is_empty() => {
                write!(f, "Failed to read document: {}", source)
            }
            ParseError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            ParseError::Yaml { source } => {
                write!(f, "Invalid query properties: {}", source)
            }
            ParseError::Json { source } => {
                write!(f, "Invalid dashboard document: {}", source)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            ParseError::Yaml { source } => Some(source),
            ParseError::Json { source } => Some(source),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io {
            path: String::new(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        ParseError::Yaml { source: err }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json { source: err }
    }
}
