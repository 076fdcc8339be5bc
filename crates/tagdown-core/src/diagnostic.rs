use crate::position::Position;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const E_TAG_NAME: &str = "E_TAG_NAME";
pub const E_OPTION_SYNTAX: &str = "E_OPTION_SYNTAX";
pub const E_UNEXPECTED_TOKEN: &str = "E_UNEXPECTED_TOKEN";
pub const E_UNEXPECTED_EOF: &str = "E_UNEXPECTED_EOF";
pub const E_UNEXPECTED_CLOSE: &str = "E_UNEXPECTED_CLOSE";
pub const E_NESTING_DEPTH: &str = "E_NESTING_DEPTH";
pub const E_ROOT_MISSING: &str = "E_ROOT_MISSING";
pub const E_ROOT_MULTIPLE: &str = "E_ROOT_MULTIPLE";

pub const V_ROOT_KIND: &str = "V_ROOT_KIND";
pub const V_OPTION_VALUE: &str = "V_OPTION_VALUE";
pub const V_OPTION_REQUIRED: &str = "V_OPTION_REQUIRED";

/// Malformed input. Parsing stops at the first one.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("Syntax Error: {message} ({position})")]
pub struct SyntaxError {
    pub code: &'static str,
    pub message: String,
    pub position: Position,
}

impl SyntaxError {
    pub fn new(code: &'static str, message: impl Into<String>, position: Position) -> Self {
        Self {
            code,
            message: single_line(message.into()),
            position,
        }
    }
}

/// A structural rule broken by one node of a well-formed tree.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("Validation Error: {message} ({position})")]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    pub position: Position,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>, position: Position) -> Self {
        Self {
            code,
            message: single_line(message.into()),
            position,
        }
    }
}

/// Every violation found in one pass, reported together.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl ParseError {
    /// Flattens the error into one entry per reported problem.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Self::Syntax(error) => vec![Diagnostic {
                kind: DiagnosticKind::Syntax,
                code: error.code,
                message: error.message.clone(),
                position: error.position,
            }],
            Self::Validation(errors) => errors
                .0
                .iter()
                .map(|error| Diagnostic {
                    kind: DiagnosticKind::Validation,
                    code: error.code,
                    message: error.message.clone(),
                    position: error.position,
                })
                .collect(),
        }
    }
}

/// Failure to obtain the raw document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
    #[error("input is not valid UTF-8 (byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    Syntax,
    Validation,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Validation => "validation",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub position: Position,
}

fn single_line(message: String) -> String {
    if message.contains('\n') {
        message.replace('\n', "\\n")
    } else {
        message
    }
}
