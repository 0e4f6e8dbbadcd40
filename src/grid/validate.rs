//! Connection matrix validation.

use std::collections::BTreeMap;
use std::fmt;

use super::connection::ConnectionMatrix;
use super::types::GridSize;
use crate::error::{GridError, Result};

/// Validate a supplied connection matrix for use with a grid.
///
/// Only the shape is checked: a matrix with the right side but broken
/// structure is accepted as-is.
pub fn validate_shape(cm: &ConnectionMatrix, size: GridSize) -> Result<()> {
    let expected = size.tot_ele();
    if cm.side() != expected {
        return Err(GridError::ConnectionMatrixShape {
            expected,
            rows: cm.side(),
            cols: cm.side(),
        });
    }
    Ok(())
}

/// A structural defect found by [`check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Diagonal entry is not zero
    SelfLoop { node: usize, value: i64 },
    /// `(row, col)` is not the negation of `(col, row)`
    NotAntisymmetric { row: usize, col: usize },
    /// Id appears more than once in the upper triangle
    DuplicateId { id: u64, count: usize },
    /// Id below the maximum never appears
    MissingId { id: u64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SelfLoop { node, value } => {
                write!(f, "diagonal entry of node {} is {}", node + 1, value)
            }
            Violation::NotAntisymmetric { row, col } => write!(
                f,
                "entries ({}, {}) and ({}, {}) are not negations of each other",
                row + 1,
                col + 1,
                col + 1,
                row + 1
            ),
            Violation::DuplicateId { id, count } => {
                write!(f, "connection {} appears {} times", id, count)
            }
            Violation::MissingId { id } => write!(f, "connection {} is missing", id),
        }
    }
}

/// Check the structural invariants of a connection matrix.
///
/// Reports a zero diagonal, antisymmetry, and that the upper-triangle ids are
/// exactly `1..=max` without repeats. Model construction never calls this.
pub fn check_invariants(cm: &ConnectionMatrix) -> Vec<Violation> {
    let n = cm.side();
    let mut violations = Vec::new();
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();

    for i in 0..n {
        let diag = cm.get(i, i);
        if diag != 0 {
            violations.push(Violation::SelfLoop {
                node: i,
                value: diag,
            });
        }
        for j in (i + 1)..n {
            let upper = cm.get(i, j);
            if upper != -cm.get(j, i) {
                violations.push(Violation::NotAntisymmetric { row: i, col: j });
            }
            if upper != 0 {
                *counts.entry(upper.unsigned_abs()).or_default() += 1;
            }
        }
    }

    for (&id, &count) in &counts {
        if count > 1 {
            violations.push(Violation::DuplicateId { id, count });
        }
    }
    let max = u64::from(cm.max_id());
    for id in 1..=max {
        if !counts.contains_key(&id) {
            violations.push(Violation::MissingId { id });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch() {
        let cm = ConnectionMatrix::zeros(3);
        assert!(validate_shape(&cm, GridSize::new(2, 1)).is_ok());
        let err = validate_shape(&cm, GridSize::new(2, 2)).unwrap_err();
        assert!(matches!(
            err,
            GridError::ConnectionMatrixShape {
                expected: 4,
                rows: 3,
                cols: 3
            }
        ));
    }

    #[test]
    fn test_valid_matrix_has_no_violations() {
        let cm = ConnectionMatrix::from_rows(vec![
            vec![0, 2, 1],
            vec![-2, 0, 3],
            vec![-1, -3, 0],
        ])
        .unwrap();
        assert!(check_invariants(&cm).is_empty());
    }

    #[test]
    fn test_reports_broken_structure() {
        let cm = ConnectionMatrix::from_rows(vec![
            vec![1, 3, 3],
            vec![-3, 0, 0],
            vec![0, 0, 0],
        ])
        .unwrap();
        let violations = check_invariants(&cm);
        assert!(violations.contains(&Violation::SelfLoop { node: 0, value: 1 }));
        assert!(violations.contains(&Violation::NotAntisymmetric { row: 0, col: 2 }));
        assert!(violations.contains(&Violation::DuplicateId { id: 3, count: 2 }));
        assert!(violations.contains(&Violation::MissingId { id: 1 }));
        assert!(violations.contains(&Violation::MissingId { id: 2 }));
    }
}
