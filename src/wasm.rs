//! WASM bindings for Gridstate Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGridModel } from 'gridstate_core';
//!
//! await init();
//!
//! const model = new WasmGridModel(`
//!   .sources 2
//!   .loads 3
//!   .param R_source 0.4
//!   .param L_source 2.3m
//!   .param C_source 10u
//!   .param R_cabel 0.722
//!   .param L_cabel 0.264m
//!   .param R_load 14
//! `, 42n);
//!
//! const n = model.state_size;
//! const a = model.a_matrix(); // Float64Array, row-major n x n
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::dsl::{self, GridDescription};
use crate::error::GridError;
use crate::model::GridModel;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: GridError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Grid model for JavaScript callers.
#[wasm_bindgen]
pub struct WasmGridModel {
    model: GridModel,
}

#[wasm_bindgen]
impl WasmGridModel {
    /// Build a model from a grid description.
    ///
    /// # Arguments
    /// * `grid_dsl` - The grid description
    /// * `seed` - Generator seed, used when the description has no cables
    ///   and no `.seed` directive
    #[wasm_bindgen(constructor)]
    pub fn new(grid_dsl: &str, seed: u64) -> Result<WasmGridModel, JsValue> {
        let ast = dsl::parse(grid_dsl).map_err(js_error)?;
        let desc = GridDescription::from_ast(ast).map_err(js_error)?;
        let mut rng = StdRng::seed_from_u64(desc.seed.unwrap_or(seed));
        let model = desc.into_model(&mut rng).map_err(js_error)?;
        Ok(WasmGridModel { model })
    }

    /// Number of states `n`.
    #[wasm_bindgen(getter)]
    pub fn state_size(&self) -> usize {
        self.model.state_size()
    }

    /// Number of connections.
    #[wasm_bindgen(getter)]
    pub fn num_connections(&self) -> u32 {
        self.model.num_connections()
    }

    /// `A` as a row-major `n * n` array.
    #[wasm_bindgen]
    pub fn a_matrix(&self) -> Vec<f64> {
        self.model.assembler().a().as_slice().to_vec()
    }

    /// `B` as a row-major `n * num_source` array.
    #[wasm_bindgen]
    pub fn b_matrix(&self) -> Vec<f64> {
        self.model.assembler().b().as_slice().to_vec()
    }

    /// `C` as a row-major `n * n` array.
    #[wasm_bindgen]
    pub fn c_matrix(&self) -> Vec<f64> {
        self.model.assembler().c().as_slice().to_vec()
    }

    /// Connection matrix as a row-major array of side `num_source + num_loads`.
    #[wasm_bindgen]
    pub fn connection_matrix(&self) -> Vec<f64> {
        self.model.connection_matrix().to_f64_vec()
    }

    /// Graphviz rendering of the topology.
    #[wasm_bindgen]
    pub fn graph_dot(&self) -> String {
        self.model.graph().to_dot()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
