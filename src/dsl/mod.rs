//! Text format for grid descriptions.
//!
//! A line-oriented language for element counts, electrical parameters,
//! generation settings and, optionally, an explicit list of cables.
//!
//! # Grammar Overview
//!
//! ```text
//! grid      = { line }
//! line      = comment | directive | cable | empty
//! comment   = ('#' | ';') { any_char }
//! directive = ".sources" integer
//!           | ".loads" integer
//!           | ".param" identifier ['='] value
//!           | ".prob" ("S2S" | "S2L") ['='] value
//!           | ".seed" integer
//! cable     = name node node
//! node      = 'S' integer | 'L' integer | integer
//! value     = number [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! Cables are numbered 1, 2, ... in order of appearance and carry current
//! from their first node to their second. `S2` is the second source, `L1` the
//! first load, and a bare integer is a 1-based node number counting sources
//! first. Without cables the topology is generated at random.
//!
//! # Example
//!
//! ```text
//! # Two inverters feeding one load
//! .sources 2
//! .loads 1
//! .param R_source 0.4
//! .param L_source 2.3m
//! .param C_source 10u
//! .param R_cabel 0.722
//! .param L_cabel 0.264m
//! .param R_load 14
//!
//! W1 S1 L1
//! W2 S2 L1
//! ```

mod ast;
mod lexer;
mod parser;

use std::collections::HashMap;

use rand::Rng;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::{GridError, Result};
use crate::grid::{ConnectionMatrix, GridSize, NodeId};
use crate::model::{GridConfig, GridModel};
use crate::params::Parameters;

/// Parse a grid description string into an AST.
pub fn parse(input: &str) -> Result<GridAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a grid description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<GridAst> {
    let content = std::fs::read_to_string(path).map_err(|e| GridError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// A grid description with node references resolved.
#[derive(Debug, Clone)]
pub struct GridDescription {
    /// Counts and probabilities
    pub config: GridConfig,
    /// Parameter values by name; checked when the model is built
    pub params: HashMap<String, f64>,
    /// Matrix built from explicit cables, if any were given
    pub cm: Option<ConnectionMatrix>,
    /// Generator seed, if given
    pub seed: Option<u64>,
}

impl GridDescription {
    /// Resolve an AST: check counts and turn cables into a connection matrix.
    pub fn from_ast(ast: GridAst) -> Result<Self> {
        let num_source = ast.num_source.ok_or(GridError::MissingDirective {
            directive: ".sources",
        })?;
        let num_loads = ast.num_loads.ok_or(GridError::MissingDirective {
            directive: ".loads",
        })?;
        let size = GridSize::new(num_source, num_loads);

        let mut config = GridConfig::new(num_source, num_loads);
        if let Some(p) = ast.s2s_p {
            config = config.with_s2s_p(p);
        }
        if let Some(p) = ast.s2l_p {
            config = config.with_s2l_p(p);
        }

        let cm = if ast.cables.is_empty() {
            None
        } else {
            Some(cables_to_matrix(&ast.cables, size)?)
        };

        Ok(Self {
            config,
            params: ast.params,
            cm,
            seed: ast.seed,
        })
    }

    /// Build the model, generating a topology from `rng` when no cables were given.
    pub fn into_model<R: Rng + ?Sized>(self, rng: &mut R) -> Result<GridModel> {
        let parameters = Parameters::from_map(&self.params)?;
        GridModel::new(self.config, parameters, self.cm, rng)
    }
}

/// Map a node reference to a node of the grid.
fn resolve(node: NodeRef, size: GridSize) -> Option<NodeId> {
    match node {
        NodeRef::Source(k) => size.source(k),
        NodeRef::Load(k) => size.load(k),
        // 1-based node number from the description
        NodeRef::Global(n) => NodeId::from_number(n).filter(|id| id.index() < size.tot_ele()),
    }
}

/// Build an antisymmetric connection matrix from cables in order.
fn cables_to_matrix(cables: &[CableDef], size: GridSize) -> Result<ConnectionMatrix> {
    let mut cm = ConnectionMatrix::zeros(size.tot_ele());

    for (id, cable) in (1i64..).zip(cables) {
        let endpoint = |node: NodeRef| {
            resolve(node, size).ok_or(GridError::UnknownNode {
                node: node.to_string(),
                line: cable.line,
            })
        };
        let from = endpoint(cable.from)?;
        let to = endpoint(cable.to)?;

        if from == to {
            return Err(GridError::SelfConnection {
                name: cable.name.clone(),
                node: from.number(),
                line: cable.line,
            });
        }
        if cm.get(from.index(), to.index()) != 0 {
            return Err(GridError::parse(
                cable.line,
                format!(
                    "cable '{}': nodes {} and {} are already connected",
                    cable.name, from, to
                ),
            ));
        }

        cm.set(from.index(), to.index(), id);
        cm.set(to.index(), from.index(), -id);
    }

    Ok(cm)
}
