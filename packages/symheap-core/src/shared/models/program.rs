//! Program-level collaborators: variables, locations, predicate symbols, call flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of a program variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PvarKind {
    /// Local of the named procedure
    Local(String),
    Global,
    /// Return slot of the named procedure
    Return(String),
}

/// Program variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pvar {
    pub name: String,
    pub kind: PvarKind,
}

impl Pvar {
    pub fn local(name: impl Into<String>, proc_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PvarKind::Local(proc_name.into()),
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PvarKind::Global,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self.kind, PvarKind::Global)
    }
}

impl fmt::Display for Pvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PvarKind::Global => write!(f, "#GB${}", self.name),
            PvarKind::Local(_) | PvarKind::Return(_) => write!(f, "&{}", self.name),
        }
    }
}

/// Source location
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: Arc<str>,
    pub line: i32,
    pub col: i32,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, line: i32, col: i32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    /// Placeholder for synthesized instructions
    pub fn none() -> Self {
        Self::new("", -1, -1)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::none()
    }
}

/// Symbol of a pure predicate, e.g. `valid` or `tainted`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredSymbol(pub Arc<str>);

impl PredSymbol {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for PredSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flags attached to a call instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallFlags {
    pub is_virtual: bool,
    pub noreturn: bool,
    pub is_interface: bool,
}
