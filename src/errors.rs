use std::{
    error::Error,
    fmt::{self, Display},
};

/// Everything that can go wrong inside one editing action. Every variant is
/// recoverable: the action that raised it is a no-op and the session is left
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A transform or query needed a selected shape and none was set.
    NoSelection,
    /// A query needed the mark point (right-click pivot) and none was set.
    NoMarkPoint,
    /// The selected shape is not the kind the query works on.
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },
    /// Not enough of some primitive in the session (lines for intersection,
    /// control points for a curve, ...).
    NotEnoughShapes {
        what: &'static str,
        needed: usize,
    },
    /// Prompt text that did not parse as the numbers the action wanted.
    ParseInput(String),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::NoSelection => write!(f, "No shape selected"),
            EditorError::NoMarkPoint => write!(f, "No mark point set"),
            EditorError::WrongShape { expected, found } => {
                write!(f, "Expected a {} to be selected, found a {}", expected, found)
            }
            EditorError::NotEnoughShapes { what, needed } => {
                write!(f, "Need at least {} {}", needed, what)
            }
            EditorError::ParseInput(input) => write!(f, "Could not parse input: {:?}", input),
        }
    }
}

impl Error for EditorError {}

/// Problems parsing an L-system grammar from its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    EmptyGrammar,
    MalformedHeader(String),
    MalformedRule(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::EmptyGrammar => write!(f, "Grammar text is empty"),
            GrammarError::MalformedHeader(header) => {
                write!(f, "Malformed grammar header: {:?}", header)
            }
            GrammarError::MalformedRule(rule) => write!(f, "Malformed rule line: {:?}", rule),
        }
    }
}

impl Error for GrammarError {}
