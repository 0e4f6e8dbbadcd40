//! Grid topology representation, generation and validation.
//!
//! A grid is a set of numbered elements (sources first, then loads) linked
//! by directed connections. The [`ConnectionMatrix`] records which elements
//! are linked and by which connection id; [`generate`] builds one at random
//! when the caller does not supply it.

mod connection;
mod generator;
mod graph;
mod types;
mod validate;

pub use connection::ConnectionMatrix;
pub use generator::{
    generate, random_fill, repair_connectivity, GeneratedTopology, Probabilities,
    DEFAULT_S2L_P, DEFAULT_S2S_P, MIN_DEGREE,
};
pub use graph::{GraphEdge, GraphExport, GraphNode};
pub use types::*;
pub use validate::{check_invariants, validate_shape, Violation};
