//! Random connection matrix generation.
//!
//! A topology is built in three steps over an initially empty matrix:
//!
//! 1. **Random fill.** Every cell of the strict upper triangle is visited in
//!    row-major order and connected with a probability chosen by the column's
//!    role: `S2L_p` when the column is a load, `S2S_p` otherwise.
//! 2. **Connectivity repair.** Each node with at most [`MIN_DEGREE`] incident
//!    connections receives up to [`MIN_DEGREE`] more, drawn uniformly without
//!    replacement from its free cells.
//! 3. **Antisymmetrize.** `CM <- CM - CM^T`.
//!
//! Connection ids are handed out by a counter that each step takes and
//! returns, so ids are `1..=num_connections` in creation order.
//!
//! The repair step raises under-connected nodes towards degree two. It does
//! not guarantee a single connected component: a group of three or more
//! nodes that are only linked among themselves stays isolated.

use log::debug;
use rand::seq::index;
use rand::Rng;

use super::connection::ConnectionMatrix;
use super::types::{GridSize, NodeId};
use crate::error::{GridError, Result};

/// Default probability that two sources are connected.
pub const DEFAULT_S2S_P: f64 = 0.1;

/// Default probability that a source (or load) connects to a load.
pub const DEFAULT_S2L_P: f64 = 0.8;

/// Number of connections the repair step aims for per node.
pub const MIN_DEGREE: usize = 2;

/// Connection probabilities for the random fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    /// Probability for cells whose column is a source
    pub s2s: f64,
    /// Probability for cells whose column is a load
    pub s2l: f64,
}

impl Default for Probabilities {
    fn default() -> Self {
        Self {
            s2s: DEFAULT_S2S_P,
            s2l: DEFAULT_S2L_P,
        }
    }
}

impl Probabilities {
    /// Create a new probability pair.
    pub fn new(s2s: f64, s2l: f64) -> Self {
        Self { s2s, s2l }
    }

    /// Check that both probabilities lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("S2S_p", self.s2s), ("S2L_p", self.s2l)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GridError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }

    /// Probability used for a cell in the given column.
    fn for_column(&self, size: GridSize, col: usize) -> f64 {
        if col >= size.num_source {
            self.s2l
        } else {
            self.s2s
        }
    }
}

/// A freshly generated topology.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTopology {
    /// Antisymmetric connection matrix
    pub cm: ConnectionMatrix,
    /// Number of connections (largest id)
    pub num_connections: u32,
}

/// Generate a random connection matrix for a grid.
pub fn generate<R: Rng + ?Sized>(
    size: GridSize,
    probabilities: Probabilities,
    rng: &mut R,
) -> GeneratedTopology {
    let mut cm = ConnectionMatrix::zeros(size.tot_ele());

    let counter = random_fill(&mut cm, size, probabilities, rng, 0);
    let filled = counter;
    let counter = repair_connectivity(&mut cm, rng, counter);
    cm.antisymmetrize();

    debug!(
        "generated {} connections for {} sources and {} loads ({} from random fill, {} from repair)",
        counter,
        size.num_source,
        size.num_loads,
        filled,
        counter - filled
    );

    GeneratedTopology {
        cm,
        num_connections: counter,
    }
}

/// Randomly connect cells of the strict upper triangle.
///
/// Returns the counter after the last assigned id.
pub fn random_fill<R: Rng + ?Sized>(
    cm: &mut ConnectionMatrix,
    size: GridSize,
    probabilities: Probabilities,
    rng: &mut R,
    mut counter: u32,
) -> u32 {
    let n = cm.side();
    for i in 0..n {
        for j in (i + 1)..n {
            let p = probabilities.for_column(size, j);
            let draw: f64 = rng.gen();
            if draw < p {
                counter += 1;
                cm.set(i, j, i64::from(counter));
            }
        }
    }
    counter
}

/// Give nodes with at most [`MIN_DEGREE`] connections up to two more.
///
/// Works on the upper triangle: a node's connections are the cells above it
/// in its column and right of the diagonal in its row. Returns the counter
/// after the last assigned id.
pub fn repair_connectivity<R: Rng + ?Sized>(
    cm: &mut ConnectionMatrix,
    rng: &mut R,
    mut counter: u32,
) -> u32 {
    let n = cm.side();
    for i in 0..n {
        let column = (0..i).map(|j| (j, i));
        let row = ((i + 1)..n).map(|j| (i, j));
        let (occupied, free): (Vec<(usize, usize)>, Vec<(usize, usize)>) = column
            .chain(row)
            .partition(|&(r, c)| cm.get(r, c) != 0);

        if occupied.len() > MIN_DEGREE {
            continue;
        }

        let amount = MIN_DEGREE.min(free.len());
        if amount == 0 {
            continue;
        }

        debug!(
            "node {} has {} connections, adding {}",
            NodeId(i),
            occupied.len(),
            amount
        );

        for pick in index::sample(rng, free.len(), amount).into_iter() {
            let (r, c) = free[pick];
            counter += 1;
            cm.set(r, c, i64::from(counter));
        }
    }
    counter
}
