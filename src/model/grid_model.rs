//! Grid model construction.

use log::info;
use rand::Rng;

use super::assemble::{StateSpace, TopologyAssembler, STATES_PER_SOURCE};
use crate::error::Result;
use crate::grid::{
    generate, validate_shape, ConnectionMatrix, GraphExport, GridSize, Probabilities,
    DEFAULT_S2L_P, DEFAULT_S2S_P,
};
use crate::params::Parameters;

/// Element counts and generation probabilities of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Number of sources
    pub num_source: usize,
    /// Number of loads
    pub num_loads: usize,
    /// Probability that two sources are connected
    pub s2s_p: f64,
    /// Probability that an element connects to a load
    pub s2l_p: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            num_source: 1,
            num_loads: 1,
            s2s_p: DEFAULT_S2S_P,
            s2l_p: DEFAULT_S2L_P,
        }
    }
}

impl GridConfig {
    /// Create a configuration with default probabilities.
    pub fn new(num_source: usize, num_loads: usize) -> Self {
        Self {
            num_source,
            num_loads,
            ..Self::default()
        }
    }

    /// Set the source-to-source connection probability.
    pub fn with_s2s_p(mut self, s2s_p: f64) -> Self {
        self.s2s_p = s2s_p;
        self
    }

    /// Set the source-to-load connection probability.
    pub fn with_s2l_p(mut self, s2l_p: f64) -> Self {
        self.s2l_p = s2l_p;
        self
    }

    /// Element counts.
    pub fn size(&self) -> GridSize {
        GridSize::new(self.num_source, self.num_loads)
    }

    /// Generation probabilities.
    pub fn probabilities(&self) -> Probabilities {
        Probabilities::new(self.s2s_p, self.s2l_p)
    }
}

/// A grid topology with its electrical parameters.
///
/// The connection matrix is fixed at construction, either supplied by the
/// caller or generated once. State-space matrices are recomputed on every
/// [`GridModel::get_sys`] call.
#[derive(Debug, Clone)]
pub struct GridModel {
    config: GridConfig,
    parameters: Parameters,
    cm: ConnectionMatrix,
    num_connections: u32,
}

impl GridModel {
    /// Construct a model, generating a topology when `cm` is `None`.
    ///
    /// A supplied matrix is only checked for its side length; the number of
    /// connections is its largest absolute entry. `rng` is untouched in that
    /// case.
    pub fn new<R: Rng + ?Sized>(
        config: GridConfig,
        parameters: Parameters,
        cm: Option<ConnectionMatrix>,
        rng: &mut R,
    ) -> Result<Self> {
        match cm {
            Some(cm) => Self::with_connection_matrix(config, parameters, cm),
            None => Self::generate(config, parameters, rng),
        }
    }

    /// Construct a model with a freshly generated topology.
    pub fn generate<R: Rng + ?Sized>(
        config: GridConfig,
        parameters: Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        parameters.validate()?;
        config.probabilities().validate()?;

        let topology = generate(config.size(), config.probabilities(), rng);
        info!(
            "generated grid with {} sources, {} loads and {} connections",
            config.num_source, config.num_loads, topology.num_connections
        );

        Ok(Self {
            config,
            parameters,
            cm: topology.cm,
            num_connections: topology.num_connections,
        })
    }

    /// Construct a model from a caller-supplied connection matrix.
    pub fn with_connection_matrix(
        config: GridConfig,
        parameters: Parameters,
        cm: ConnectionMatrix,
    ) -> Result<Self> {
        parameters.validate()?;
        config.probabilities().validate()?;
        validate_shape(&cm, config.size())?;

        let num_connections = cm.max_id();
        info!(
            "using supplied connection matrix with {} connections",
            num_connections
        );

        Ok(Self {
            config,
            parameters,
            cm,
            num_connections,
        })
    }

    /// State-space matrices `(A, B, C, D)`.
    pub fn get_sys(&self) -> StateSpace {
        self.assembler().state_space()
    }

    /// Assembler over this model's topology, for access to individual blocks.
    pub fn assembler(&self) -> TopologyAssembler<'_> {
        TopologyAssembler::new(
            &self.cm,
            self.config.num_source,
            self.num_connections,
            &self.parameters,
        )
    }

    /// Edge list and node categories for graph viewers.
    pub fn graph(&self) -> GraphExport {
        GraphExport::from_matrix(&self.cm, self.config.size(), self.num_connections)
    }

    /// The connection matrix.
    pub fn connection_matrix(&self) -> &ConnectionMatrix {
        &self.cm
    }

    /// Number of connections.
    pub fn num_connections(&self) -> u32 {
        self.num_connections
    }

    /// Number of sources.
    pub fn num_source(&self) -> usize {
        self.config.num_source
    }

    /// Number of loads.
    pub fn num_loads(&self) -> usize {
        self.config.num_loads
    }

    /// Total number of elements.
    pub fn tot_ele(&self) -> usize {
        self.config.size().tot_ele()
    }

    /// State dimension `2 * num_source + num_connections`.
    pub fn state_size(&self) -> usize {
        STATES_PER_SOURCE * self.config.num_source + self.num_connections as usize
    }

    /// Construction configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Electrical parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;
    use crate::error::GridError;
    use crate::grid::{check_invariants, random_fill, NodeId};

    fn unit_params() -> Parameters {
        Parameters {
            r_source: 1.0,
            l_source: 1.0,
            c_source: 1.0,
            r_cabel: 1.0,
            l_cabel: 1.0,
            r_load: 1.0,
        }
    }

    /// An RNG that fails the test when drawn from.
    struct NoRandomness;

    impl RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("random source used");
        }
        fn next_u64(&mut self) -> u64 {
            panic!("random source used");
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("random source used");
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            panic!("random source used");
        }
    }

    #[test]
    fn test_generated_model_shapes() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let model =
                GridModel::generate(GridConfig::new(3, 4), unit_params(), &mut rng).unwrap();
            let ss = model.get_sys();
            let n = 2 * 3 + model.num_connections() as usize;

            assert_eq!(model.state_size(), n);
            assert_eq!(ss.a.shape(), (n, n));
            assert_eq!(ss.b.shape(), (n, 3));
            assert!(ss.c.is_identity());
            assert_eq!(ss.c.rows(), n);
            assert_eq!(ss.d, 0.0);
            assert!(check_invariants(model.connection_matrix()).is_empty());
        }
    }

    #[test]
    fn test_get_sys_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(9);
        let model = GridModel::generate(GridConfig::new(2, 3), unit_params(), &mut rng).unwrap();
        let first = model.get_sys();
        let second = model.get_sys();
        assert_eq!(first, second);
        assert_eq!(first.a.as_slice(), second.a.as_slice());
    }

    #[test]
    fn test_forced_topology_without_source_link() {
        // With S2S_p = 0 and S2L_p = 1 the random fill links each source to
        // the load and never the sources to each other.
        let config = GridConfig::new(2, 1).with_s2s_p(0.0).with_s2l_p(1.0);
        let mut cm = ConnectionMatrix::zeros(3);
        let mut rng = StdRng::seed_from_u64(0);
        let count = random_fill(&mut cm, config.size(), config.probabilities(), &mut rng, 0);
        cm.antisymmetrize();
        assert_eq!(count, 2);

        let model = GridModel::with_connection_matrix(config, unit_params(), cm).unwrap();
        let ss = model.get_sys();
        let asm = model.assembler();

        assert_eq!(asm.source_block().to_rows(), vec![vec![-1.0, -1.0], vec![1.0, 0.0]]);
        for k in 0..2 {
            let offset = 2 * k;
            assert_eq!(ss.a.get(offset, offset), -1.0);
            assert_eq!(ss.a.get(offset, offset + 1), -1.0);
            assert_eq!(ss.a.get(offset + 1, offset), 1.0);
            assert_eq!(ss.a.get(offset + 1, offset + 1), 0.0);
        }

        // Source 1 only couples to connection 1 (state 4), source 2 only to
        // connection 2 (state 5).
        assert_eq!(ss.a.get(1, 4), -1.0);
        assert_eq!(ss.a.get(1, 5), 0.0);
        assert_eq!(ss.a.get(3, 5), -1.0);
        assert_eq!(ss.a.get(3, 4), 0.0);
        assert_eq!(ss.a.get(4, 3), 0.0);
        assert_eq!(ss.a.get(5, 1), 0.0);
        // Shared load couples the two feeders.
        assert_eq!(ss.a.get(4, 5), -1.0);
        assert_eq!(ss.a.get(5, 4), -1.0);
        assert_eq!(ss.a.get(4, 4), -2.0);
    }

    #[test]
    fn test_single_node_model() {
        let mut rng = StdRng::seed_from_u64(0);
        let model = GridModel::generate(GridConfig::new(1, 0), unit_params(), &mut rng).unwrap();
        let ss = model.get_sys();

        assert_eq!(model.num_connections(), 0);
        assert_eq!(ss.a.to_rows(), vec![vec![-1.0, -1.0], vec![1.0, 0.0]]);
        assert_eq!(ss.b.to_rows(), vec![vec![1.0], vec![0.0]]);
        assert!(ss.c.is_identity());
        assert_eq!(ss.c.shape(), (2, 2));
        assert_eq!(ss.d, 0.0);
    }

    #[test]
    fn test_supplied_matrix_skips_generator() {
        let cm = ConnectionMatrix::from_rows(vec![
            vec![0, 1, 2, 0],
            vec![-1, 0, 0, 3],
            vec![-2, 0, 0, 4],
            vec![0, -3, -4, 0],
        ])
        .unwrap();
        let model = GridModel::new(
            GridConfig::new(2, 2),
            unit_params(),
            Some(cm.clone()),
            &mut NoRandomness,
        )
        .unwrap();

        assert_eq!(model.num_connections(), 4);
        assert_eq!(model.connection_matrix(), &cm);

        let ss = model.get_sys();
        assert_eq!(ss.a.shape(), (8, 8));
        assert_eq!(ss.b.shape(), (8, 2));
        assert!(ss.c.is_identity());

        let mut rng = StdRng::seed_from_u64(1);
        let generated =
            GridModel::generate(GridConfig::new(2, 2), unit_params(), &mut rng).unwrap();
        let n = generated.state_size();
        assert_eq!(generated.get_sys().a.shape(), (n, n));
    }

    #[test]
    fn test_supplied_matrix_shape_mismatch() {
        let cm = ConnectionMatrix::zeros(2);
        let err = GridModel::with_connection_matrix(GridConfig::new(2, 1), unit_params(), cm)
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert!(matches!(err, GridError::ConnectionMatrixShape { expected: 3, .. }));
    }

    #[test]
    fn test_malformed_matrix_accepted_as_is() {
        // Right shape, broken structure: not antisymmetric, id 1 missing.
        let cm = ConnectionMatrix::from_rows(vec![vec![0, 2], vec![0, 0]]).unwrap();
        let model =
            GridModel::with_connection_matrix(GridConfig::new(1, 1), unit_params(), cm).unwrap();
        assert_eq!(model.num_connections(), 2);
        assert_eq!(model.get_sys().a.shape(), (4, 4));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GridConfig::new(2, 2).with_s2l_p(-0.1);
        let err = GridModel::generate(config, unit_params(), &mut rng).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_graph_export_matches_matrix() {
        let mut rng = StdRng::seed_from_u64(11);
        let model = GridModel::generate(GridConfig::new(2, 3), unit_params(), &mut rng).unwrap();
        let graph = model.graph();
        assert_eq!(graph.edges.len(), model.num_connections() as usize);
        assert_eq!(graph.nodes.len(), 5);
        for edge in &graph.edges {
            let from = NodeId::from_number(edge.source).unwrap();
            let to = NodeId::from_number(edge.target).unwrap();
            assert_eq!(
                model.connection_matrix().get(from.index(), to.index()),
                i64::from(edge.connection.0)
            );
        }
    }
}
