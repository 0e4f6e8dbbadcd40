//! State-space model of a grid.
//!
//! [`GridModel`] ties a topology to its electrical parameters and produces
//! the linear system
//!
//! ```text
//! x' = A x + B u
//! y  = C x + D u
//! ```
//!
//! with one inductor current and one capacitor voltage per source, one
//! current per connection, one input per source, full state output and no
//! feedthrough.

mod assemble;
mod dense;
mod grid_model;

pub use assemble::{StateSpace, TopologyAssembler, STATES_PER_SOURCE};
pub use dense::DenseMatrix;
pub use grid_model::{GridConfig, GridModel};
