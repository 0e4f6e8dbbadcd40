//! Signed connection matrix.

use std::fmt;

use serde::{Serialize, Serializer};

use super::types::{ConnectionId, NodeId};
use crate::error::{GridError, Result};

/// Square signed adjacency matrix of a grid (CM).
///
/// Entry `(i, j) = +id` means connection `id` carries current from node `i`
/// to node `j`; the mirrored entry `(j, i)` holds `-id`. The diagonal is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionMatrix {
    /// Entries (row-major)
    data: Vec<i64>,
    /// Side length
    side: usize,
}

impl ConnectionMatrix {
    /// Create an empty matrix with the given side.
    pub fn zeros(side: usize) -> Self {
        Self {
            data: vec![0; side * side],
            side,
        }
    }

    /// Build a matrix from rows.
    ///
    /// Every row must have as many entries as there are rows and every entry
    /// must fit a [`ConnectionId`] once its sign is dropped. Otherwise the
    /// contents are taken as-is; see [`super::check_invariants`] for
    /// structural checks.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let side = rows.len();
        let mut data = Vec::with_capacity(side * side);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != side {
                return Err(GridError::InvalidConnectionMatrix {
                    row,
                    expected: side,
                    found: entries.len(),
                });
            }
            if let Some((col, &value)) = entries
                .iter()
                .enumerate()
                .find(|(_, v)| u32::try_from(v.unsigned_abs()).is_err())
            {
                return Err(GridError::ConnectionIdOutOfRange { row, col, value });
            }
            data.extend(entries);
        }
        Ok(Self { data, side })
    }

    /// Side length (number of grid elements).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Get entry at (row, col).
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.side + col]
    }

    /// Set entry at (row, col).
    pub(crate) fn set(&mut self, row: usize, col: usize, value: i64) {
        self.data[row * self.side + col] = value;
    }

    /// All entries of one row.
    pub fn row(&self, row: usize) -> &[i64] {
        &self.data[row * self.side..(row + 1) * self.side]
    }

    /// All entries of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = i64> + '_ {
        (0..self.side).map(move |row| self.get(row, col))
    }

    /// Largest absolute entry, i.e. the number of connections.
    pub fn max_id(&self) -> u32 {
        self.data
            .iter()
            .filter_map(|v| u32::try_from(v.unsigned_abs()).ok())
            .max()
            .unwrap_or(0)
    }

    /// Locate the cell holding `+id` as (from, to), scanning rows in order.
    pub fn find(&self, id: ConnectionId) -> Option<(NodeId, NodeId)> {
        let target = i64::from(id.0);
        self.data
            .iter()
            .position(|&v| v == target)
            .map(|pos| (NodeId(pos / self.side), NodeId(pos % self.side)))
    }

    /// Number of connections incident to a node.
    ///
    /// Counts both the row and the column so that matrices holding only the
    /// upper triangle (during generation) report the same degree as finished
    /// antisymmetric ones.
    pub fn degree(&self, node: NodeId) -> usize {
        let i = node.index();
        (0..self.side)
            .filter(|&j| j != i && (self.get(i, j) != 0 || self.get(j, i) != 0))
            .count()
    }

    /// Replace the matrix with `CM - CM^T`.
    pub(crate) fn antisymmetrize(&mut self) {
        let n = self.side;
        for i in 0..n {
            self.set(i, i, 0);
            for j in (i + 1)..n {
                let upper = self.get(i, j);
                let lower = self.get(j, i);
                self.set(i, j, upper - lower);
                self.set(j, i, lower - upper);
            }
        }
    }

    /// Row-major entries as floats.
    ///
    /// Entries are bounded by `u32::MAX` in magnitude, so the conversion is exact.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data.iter().map(|&v| v as f64).collect()
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.data.chunks(self.side.max(1)).map(<[i64]>::to_vec).collect()
    }
}

impl Serialize for ConnectionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl fmt::Display for ConnectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .data
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        for row in 0..self.side {
            let cells: Vec<String> = self
                .row(row)
                .iter()
                .map(|v| format!("{:>width$}", v, width = width))
                .collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
