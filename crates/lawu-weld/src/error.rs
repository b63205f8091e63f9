//! Error types for the generator

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for lawu-weld operations
pub type WeldResult<T> = Result<T, WeldError>;

/// Where something was declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Source file
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (0-indexed)
    pub column: Option<usize>,
}

impl Location {
    /// A location in a file
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            column: Some(column),
        }
    }

    /// A location in a file, without line information
    pub fn in_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            line: None,
            column: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}", file.display())?,
            None => write!(f, "<unknown>")?,
        }
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// Main error type for lawu-weld
///
/// Everything except `EnvVarMissing`, `Config`, `Syn` and `Io` only aborts
/// the generation request it was raised for.
#[derive(Debug, Error)]
pub enum WeldError {
    /// Malformed snippet or ambiguous declaration
    #[error("Parse error in {native} at {location}: {message}")]
    Parse {
        native: String,
        message: String,
        location: Location,
    },

    /// A member without an accessor, or an accessor without a member
    #[error("Missing binding for {native}.{member}: {message}")]
    MissingBinding {
        native: String,
        member: String,
        message: String,
        location: Location,
    },

    /// Two accessors of the same kind family for one member
    #[error("Duplicate accessor for {native}.{member}")]
    DuplicateAccessor {
        native: String,
        member: String,
        location: Location,
    },

    /// Two mappings for one native name or one destination
    #[error("Duplicate mapping for {name}: {message}")]
    DuplicateMapping { name: String, message: String },

    /// Header constant without exactly one owner reference
    #[error("Ambiguous owner for {constant}: found {found} owner references")]
    AmbiguousOwner {
        constant: String,
        found: usize,
        location: Location,
    },

    /// No member shape applies
    #[error("Unresolved member {native}.{member}: no shape for `{type_name}` declared as {declarator}")]
    UnresolvedMember {
        native: String,
        member: String,
        type_name: String,
        declarator: String,
        location: Location,
    },

    /// Array member whose element type has no layout constant
    #[error("Missing layout constant `{type_name}` for {native}.{member}")]
    MissingLayoutConstant {
        native: String,
        member: String,
        type_name: String,
        location: Location,
    },

    /// Documentation holds no structure body for the requested type
    #[error("No declaration of {native} found in its documentation")]
    NoMatchingDeclaration { native: String, location: Location },

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarMissing(String),

    /// Invalid generator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rust source that could not be read as Rust
    #[error("Failed to parse {file}: {message}")]
    Syn { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WeldError {
    /// Whether the error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WeldError::EnvVarMissing(_)
                | WeldError::Config(_)
                | WeldError::Syn { .. }
                | WeldError::Io(_)
        )
    }

    /// Diagnostic code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            WeldError::Parse { .. } => "W0001",
            WeldError::MissingBinding { .. } => "W0002",
            WeldError::DuplicateAccessor { .. } => "W0003",
            WeldError::DuplicateMapping { .. } => "W0004",
            WeldError::AmbiguousOwner { .. } => "W0005",
            WeldError::UnresolvedMember { .. } => "W0006",
            WeldError::MissingLayoutConstant { .. } => "W0007",
            WeldError::NoMatchingDeclaration { .. } => "W0008",
            WeldError::EnvVarMissing(_)
            | WeldError::Config(_)
            | WeldError::Syn { .. }
            | WeldError::Io(_) => "F0001",
        }
    }

    /// The declaration the error is attributed to, when known
    pub fn location(&self) -> Option<&Location> {
        match self {
            WeldError::Parse { location, .. }
            | WeldError::MissingBinding { location, .. }
            | WeldError::DuplicateAccessor { location, .. }
            | WeldError::AmbiguousOwner { location, .. }
            | WeldError::UnresolvedMember { location, .. }
            | WeldError::MissingLayoutConstant { location, .. }
            | WeldError::NoMatchingDeclaration { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Create a duplicate mapping error
    pub fn duplicate_mapping(name: impl Into<String>, message: impl Into<String>) -> Self {
        WeldError::DuplicateMapping {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        WeldError::Config(message.into())
    }
}
