use std::path::PathBuf;

/// Errors raised while building humanoid skeleton descriptions.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    #[error("bone table not found: {0}")]
    MissingResource(PathBuf),

    #[error("I/O error reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed bone table line {line}: '{content}'")]
    MalformedTable { line: usize, content: String },

    #[error("ambiguous bone mapping: {0}")]
    AmbiguousMapping(String),

    #[error("bones without a humanoid role: {}", unmapped.join(", "))]
    IncompleteMapping { unmapped: Vec<String> },
}
