//! State-space matrix assembly.
//!
//! The state vector holds, for every source `k`, its filter inductor current
//! and capacitor voltage in slots `2k` and `2k + 1`, followed by one current
//! per connection (slot `2 * num_source + id - 1`). `A` is assembled as
//!
//! ```text
//! [ A_source  A_col         ]
//! [ A_row     A_transitions ]
//! ```
//!
//! where `A_source` is block-diagonal with one 2x2 block per source, `A_col`
//! couples connection currents into the source capacitor voltages, `A_row`
//! couples source voltages into connection currents, and `A_transitions`
//! holds cable and load resistances.

use log::warn;
use serde::Serialize;

use super::dense::DenseMatrix;
use crate::grid::{ConnectionId, ConnectionMatrix, NodeId};
use crate::params::Parameters;

/// States per source (inductor current, capacitor voltage).
pub const STATES_PER_SOURCE: usize = 2;

/// Slot of the capacitor voltage within a source's states.
const VOLTAGE_SLOT: usize = 1;

/// Linear time-invariant system `x' = A x + B u`, `y = C x + D u`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSpace {
    /// System matrix (n x n)
    pub a: DenseMatrix,
    /// Input matrix (n x num_source)
    pub b: DenseMatrix,
    /// Output matrix, identity (n x n)
    pub c: DenseMatrix,
    /// Feedthrough, always zero
    pub d: f64,
}

impl StateSpace {
    /// Number of states `n`.
    pub fn state_size(&self) -> usize {
        self.a.rows()
    }

    /// Number of inputs (one per source).
    pub fn num_inputs(&self) -> usize {
        self.b.cols()
    }

    /// `D` expanded to an explicit `(n, num_inputs)` zero matrix.
    pub fn d_matrix(&self) -> DenseMatrix {
        DenseMatrix::zeros(self.state_size(), self.num_inputs())
    }
}

/// Builds the state-space matrices of one grid.
#[derive(Debug, Clone, Copy)]
pub struct TopologyAssembler<'a> {
    cm: &'a ConnectionMatrix,
    num_source: usize,
    num_connections: usize,
    params: &'a Parameters,
}

impl<'a> TopologyAssembler<'a> {
    /// Create an assembler over a validated connection matrix.
    pub fn new(
        cm: &'a ConnectionMatrix,
        num_source: usize,
        num_connections: u32,
        params: &'a Parameters,
    ) -> Self {
        Self {
            cm,
            num_source,
            num_connections: num_connections as usize,
            params,
        }
    }

    /// State dimension `2 * num_source + num_connections`.
    pub fn state_size(&self) -> usize {
        STATES_PER_SOURCE * self.num_source + self.num_connections
    }

    /// Local dynamics of one source (2x2).
    pub fn source_block(&self) -> DenseMatrix {
        let p = self.params;
        let mut a = DenseMatrix::zeros(2, 2);
        a.set(0, 0, -p.r_source / p.l_source);
        a.set(0, 1, -1.0 / p.l_source);
        a.set(1, 0, 1.0 / p.c_source);
        a
    }

    /// Input column of one source (2x1); drives the inductor current only.
    pub fn source_input(&self) -> DenseMatrix {
        let mut b = DenseMatrix::zeros(2, 1);
        b.set(0, 0, 1.0 / self.params.l_source);
        b
    }

    /// Effect of connection currents on a source's states (2 x num_connections).
    pub fn source_coupling(&self, source: NodeId) -> DenseMatrix {
        let mut a_col = DenseMatrix::zeros(2, self.num_connections);
        for (id, sign) in self.incident(source) {
            a_col.set(VOLTAGE_SLOT, id.slot(), sign * (-1.0 / self.params.c_source));
        }
        a_col
    }

    /// Effect of a source's states on connection currents (num_connections x 2).
    ///
    /// Reads the same CM row as [`Self::source_coupling`]; antisymmetry puts
    /// both outgoing (`+id`) and incoming (`-id`) connections there.
    pub fn connection_drive(&self, source: NodeId) -> DenseMatrix {
        let mut a_row = DenseMatrix::zeros(2, self.num_connections);
        for (id, sign) in self.incident(source) {
            a_row.set(VOLTAGE_SLOT, id.slot(), sign * (1.0 / self.params.l_cabel));
        }
        a_row.transpose()
    }

    /// Connection-to-connection dynamics (num_connections x num_connections).
    ///
    /// A connection into a source only sees its cable. A connection into a
    /// load also sees the load resistance, which it shares with every other
    /// connection feeding that load.
    pub fn transitions(&self) -> DenseMatrix {
        let p = self.params;
        let nc = self.num_connections;
        let mut a = DenseMatrix::zeros(nc, nc);

        for id in (1..=nc as u32).map(ConnectionId) {
            let i = id.slot();
            let Some((_, to)) = self.cm.find(id) else {
                warn!("connection {} has no positive cell in the connection matrix", id.0);
                continue;
            };

            if to.index() < self.num_source {
                a.set(i, i, -p.r_cabel / p.l_cabel);
                continue;
            }

            a.set(i, i, -(p.r_cabel + p.r_load) / p.l_cabel);
            for other in self.cm.column(to.index()) {
                if other > 0 && other != i64::from(id.0) && (other as usize) <= nc {
                    a.set(i, other as usize - 1, -p.r_load / p.l_cabel);
                }
            }
        }
        a
    }

    /// Assemble `A`.
    pub fn a(&self) -> DenseMatrix {
        let ns = STATES_PER_SOURCE * self.num_source;
        let mut a = DenseMatrix::zeros(self.state_size(), self.state_size());

        let block = self.source_block();
        for k in 0..self.num_source {
            let source = NodeId(k);
            let offset = STATES_PER_SOURCE * k;
            a.set_block(offset, offset, &block);
            a.set_block(offset, ns, &self.source_coupling(source));
            a.set_block(ns, offset, &self.connection_drive(source));
        }
        a.set_block(ns, ns, &self.transitions());
        a
    }

    /// Assemble `B`: one input channel per source.
    pub fn b(&self) -> DenseMatrix {
        let mut b = DenseMatrix::zeros(self.state_size(), self.num_source);
        let block = self.source_input();
        for k in 0..self.num_source {
            b.set_block(STATES_PER_SOURCE * k, k, &block);
        }
        b
    }

    /// Assemble `C`: full state observation.
    pub fn c(&self) -> DenseMatrix {
        DenseMatrix::identity(self.state_size())
    }

    /// Assemble all four matrices.
    pub fn state_space(&self) -> StateSpace {
        StateSpace {
            a: self.a(),
            b: self.b(),
            c: self.c(),
            d: 0.0,
        }
    }

    /// Connections in a node's CM row with their direction sign.
    fn incident(&self, node: NodeId) -> impl Iterator<Item = (ConnectionId, f64)> + '_ {
        let nc = self.num_connections;
        self.cm
            .row(node.index())
            .iter()
            .filter(|&&v| v != 0)
            .filter_map(|&v| {
                let id = u32::try_from(v.unsigned_abs()).ok()?;
                Some((ConnectionId(id), v.signum() as f64))
            })
            .filter(move |(id, _)| id.slot() < nc)
    }
}
