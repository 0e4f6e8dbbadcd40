//! Abstract Syntax Tree types for the grid description language.

use std::collections::HashMap;
use std::fmt;

/// Complete AST representation of a parsed grid description.
#[derive(Debug, Clone, Default)]
pub struct GridAst {
    /// Value of `.sources`
    pub num_source: Option<usize>,
    /// Value of `.loads`
    pub num_loads: Option<usize>,
    /// `.param` entries, keyed by parameter name as written
    pub params: HashMap<String, f64>,
    /// `.prob S2S` value
    pub s2s_p: Option<f64>,
    /// `.prob S2L` value
    pub s2l_p: Option<f64>,
    /// `.seed` value
    pub seed: Option<u64>,
    /// Explicit cables, in order of appearance
    pub cables: Vec<CableDef>,
}

impl GridAst {
    /// Create a new empty grid AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A cable line: `<name> <from> <to>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CableDef {
    /// Unique cable name
    pub name: String,
    /// Node current flows out of
    pub from: NodeRef,
    /// Node current flows into
    pub to: NodeRef,
    /// Source line number for error reporting
    pub line: usize,
}

/// A node reference in a cable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// `S<k>`: the k-th source (1-based)
    Source(usize),
    /// `L<k>`: the k-th load (1-based)
    Load(usize),
    /// Plain 1-based node number
    Global(usize),
}

impl NodeRef {
    /// Parse `S<k>` / `L<k>` identifiers.
    pub fn from_identifier(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let prefix = chars.next()?;
        let index: usize = chars.as_str().parse().ok()?;
        match prefix.to_ascii_uppercase() {
            'S' => Some(Self::Source(index)),
            'L' => Some(Self::Load(index)),
            _ => None,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Source(k) => write!(f, "S{}", k),
            NodeRef::Load(k) => write!(f, "L{}", k),
            NodeRef::Global(n) => write!(f, "{}", n),
        }
    }
}
