//! # Gridstate Core
//!
//! Linear state-space models of small electrical power grids.
//!
//! This library provides:
//! - Random generation of grid topologies (sources, loads and the cables
//!   between them) as a signed connection matrix
//! - Assembly of the matrices `(A, B, C, D)` of the grid's linear
//!   time-invariant model from any connection matrix and a set of
//!   electrical parameters
//! - A text format for grid descriptions and an edge-list export for
//!   graph viewers
//!
//! ## Architecture
//!
//! - [`params`] - Electrical parameters of sources, cables and loads
//! - [`grid`] - Connection matrix, random generation, validation, graph export
//! - [`model`] - State-space assembly and the [`GridModel`] facade
//! - [`dsl`] - Parser for grid description files
//! - [`output`] - Text and JSON reports (CLI only)
//!
//! ## Usage
//!
//! ```no_run
//! use gridstate_core::{GridConfig, GridModel, Parameters};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let params = Parameters {
//!     r_source: 0.4,
//!     l_source: 2.3e-3,
//!     c_source: 10e-6,
//!     r_cabel: 0.722,
//!     l_cabel: 0.264e-3,
//!     r_load: 14.0,
//! };
//! let mut rng = StdRng::seed_from_u64(7);
//! let model = GridModel::generate(GridConfig::new(2, 3), params, &mut rng)?;
//! let sys = model.get_sys();
//! assert_eq!(sys.a.rows(), 4 + model.num_connections() as usize);
//! # Ok::<(), gridstate_core::GridError>(())
//! ```
//!
//! ## State Layout
//!
//! Each source contributes its filter inductor current and capacitor voltage,
//! each connection its cable current:
//!
//! ```text
//! x = [i_L1, v_C1, i_L2, v_C2, ..., i_W1, i_W2, ...]
//! ```
//!
//! One input per source drives its inductor, every state is observed, and
//! there is no feedthrough.

pub mod dsl;
pub mod error;
pub mod grid;
pub mod model;
pub mod params;

#[cfg(feature = "cli")]
pub mod output;

// Re-export main types for convenience
pub use error::{GridError, Result};
pub use grid::{ConnectionMatrix, GraphExport};
pub use model::{GridConfig, GridModel, StateSpace};
pub use params::Parameters;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmGridModel;
