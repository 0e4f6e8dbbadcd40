//! Core types for grid topology representation.

use std::fmt;

use serde::Serialize;

/// A grid element (source or load).
///
/// Stores the 0-based index used for matrix storage. The 1-based node number
/// seen by users is produced by [`NodeId::number`] and parsed by
/// [`NodeId::from_number`]; nothing else converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Node for a 1-based external number. Returns `None` for 0.
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).map(NodeId)
    }

    /// 1-based external number of this node.
    pub fn number(&self) -> usize {
        self.0 + 1
    }

    /// Index into matrix rows and columns.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Identifier of a directed connection (cable).
///
/// Holds the external 1-based id as it appears in the connection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    /// 0-based slot of this connection among the connection states.
    pub fn slot(&self) -> usize {
        debug_assert!(self.0 > 0, "connection ids start at 1");
        self.0 as usize - 1
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Role of a grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Controllable source (inverter with LC filter)
    Source,
    /// Resistive load
    Load,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Source => write!(f, "source"),
            NodeKind::Load => write!(f, "load"),
        }
    }
}

/// Element counts of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Number of sources (nodes `1..=num_source`)
    pub num_source: usize,
    /// Number of loads (nodes after the sources)
    pub num_loads: usize,
}

impl GridSize {
    /// Create a new grid size.
    pub fn new(num_source: usize, num_loads: usize) -> Self {
        Self {
            num_source,
            num_loads,
        }
    }

    /// Total number of elements.
    pub fn tot_ele(&self) -> usize {
        self.num_source + self.num_loads
    }

    /// Role of the node at the given 0-based index.
    pub fn kind(&self, node: NodeId) -> NodeKind {
        if node.index() < self.num_source {
            NodeKind::Source
        } else {
            NodeKind::Load
        }
    }

    /// Node id of the k-th source (1-based k).
    pub fn source(&self, k: usize) -> Option<NodeId> {
        (k >= 1 && k <= self.num_source).then(|| NodeId(k - 1))
    }

    /// Node id of the k-th load (1-based k).
    pub fn load(&self, k: usize) -> Option<NodeId> {
        (k >= 1 && k <= self.num_loads).then(|| NodeId(self.num_source + k - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_numbering() {
        assert_eq!(NodeId::from_number(1), Some(NodeId(0)));
        assert_eq!(NodeId::from_number(0), None);
        assert_eq!(NodeId(4).number(), 5);
        assert_eq!(NodeId(4).to_string(), "5");
    }

    #[test]
    fn test_grid_roles() {
        let size = GridSize::new(2, 3);
        assert_eq!(size.tot_ele(), 5);
        assert_eq!(size.kind(NodeId(1)), NodeKind::Source);
        assert_eq!(size.kind(NodeId(2)), NodeKind::Load);
        assert_eq!(size.source(2), Some(NodeId(1)));
        assert_eq!(size.source(3), None);
        assert_eq!(size.load(1), Some(NodeId(2)));
        assert_eq!(size.load(4), None);
    }

    #[test]
    fn test_connection_slot() {
        assert_eq!(ConnectionId(1).slot(), 0);
        assert_eq!(ConnectionId(7).to_string(), "W7");
    }
}
