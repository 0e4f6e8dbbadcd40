//! Result output for the CLI frontend.
//!
//! Writes the connection matrix, the state-space matrices and optionally
//! the graph export as plain text or JSON.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{GridError, Result};
use crate::grid::{check_invariants, ConnectionMatrix, GraphExport};
use crate::model::{DenseMatrix, GridModel};

/// Format of the model report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable matrices
    Text,
    /// One JSON document
    Json,
}

/// What to emit for graph viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// Nothing
    None,
    /// Edge list with categories
    Edges,
    /// Graphviz DOT
    Dot,
}

/// Everything written for one model.
#[derive(Debug, Serialize)]
struct ModelReport<'a> {
    num_source: usize,
    num_loads: usize,
    num_connections: u32,
    connection_matrix: &'a ConnectionMatrix,
    a: DenseMatrix,
    b: DenseMatrix,
    c: DenseMatrix,
    d: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph: Option<GraphExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Vec<String>>,
}

impl<'a> ModelReport<'a> {
    fn new(model: &'a GridModel, graph: GraphFormat, check: bool) -> Self {
        let sys = model.get_sys();
        let export = model.graph();
        Self {
            num_source: model.num_source(),
            num_loads: model.num_loads(),
            num_connections: model.num_connections(),
            connection_matrix: model.connection_matrix(),
            a: sys.a,
            b: sys.b,
            c: sys.c,
            d: sys.d,
            dot: (graph == GraphFormat::Dot).then(|| export.to_dot()),
            graph: (graph == GraphFormat::Edges).then_some(export),
            violations: check.then(|| {
                check_invariants(model.connection_matrix())
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }),
        }
    }
}

/// Write a report for `model` to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    model: &GridModel,
    format: OutputFormat,
    graph: GraphFormat,
    check: bool,
) -> Result<()> {
    let report = ModelReport::new(model, graph, check);
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)
                .map_err(|e| GridError::output(e.to_string()))?;
            writeln!(out).map_err(io_error)
        }
        OutputFormat::Text => write_text(out, &report).map_err(io_error),
    }
}

fn io_error(e: std::io::Error) -> GridError {
    GridError::output(e.to_string())
}

fn write_text<W: Write>(out: &mut W, report: &ModelReport<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "# {} sources, {} loads, {} connections",
        report.num_source, report.num_loads, report.num_connections
    )?;
    writeln!(out, "\nCM =")?;
    write!(out, "{}", report.connection_matrix)?;
    writeln!(out, "\nA =")?;
    write!(out, "{}", report.a)?;
    writeln!(out, "\nB =")?;
    write!(out, "{}", report.b)?;
    writeln!(out, "\nC = I({})", report.c.rows())?;
    writeln!(out, "D = {}", report.d)?;

    if let Some(graph) = &report.graph {
        writeln!(out, "\nedges:")?;
        for edge in &graph.edges {
            writeln!(
                out,
                "  {}: {} -> {} ({})",
                edge.connection, edge.source, edge.target, edge.kind
            )?;
        }
        writeln!(out, "nodes:")?;
        for node in &graph.nodes {
            writeln!(out, "  {}: {}", node.node, node.kind)?;
        }
    }

    if let Some(dot) = &report.dot {
        writeln!(out)?;
        writeln!(out, "{}", dot)?;
    }

    if let Some(violations) = &report.violations {
        if violations.is_empty() {
            writeln!(out, "\nconnection matrix invariants hold")?;
        } else {
            writeln!(out, "\nconnection matrix violations:")?;
            for v in violations {
                writeln!(out, "  {}", v)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridConfig;
    use crate::params::Parameters;

    fn model() -> GridModel {
        let params = Parameters {
            r_source: 1.0,
            l_source: 1.0,
            c_source: 1.0,
            r_cabel: 1.0,
            l_cabel: 1.0,
            r_load: 1.0,
        };
        let cm = ConnectionMatrix::from_rows(vec![vec![0, 1], vec![-1, 0]]).unwrap();
        GridModel::with_connection_matrix(GridConfig::new(1, 1), params, cm).unwrap()
    }

    #[test]
    fn test_json_report() {
        let mut buf = Vec::new();
        write_report(&mut buf, &model(), OutputFormat::Json, GraphFormat::Edges, true).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json["num_connections"], 1);
        assert_eq!(json["connection_matrix"][0][1], 1);
        assert_eq!(json["a"].as_array().unwrap().len(), 3);
        assert_eq!(json["b"][0][0], 1.0);
        assert_eq!(json["d"], 0.0);
        assert_eq!(json["graph"]["edges"][0]["target"], 2);
        assert!(json["violations"].as_array().unwrap().is_empty());
        assert!(json.get("dot").is_none());
    }

    #[test]
    fn test_text_report_with_dot() {
        let mut buf = Vec::new();
        write_report(&mut buf, &model(), OutputFormat::Text, GraphFormat::Dot, false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# 1 sources, 1 loads, 1 connections"));
        assert!(text.contains("C = I(3)"));
        assert!(text.contains("graph grid {"));
        assert!(!text.contains("invariants"));
    }
}
