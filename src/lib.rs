pub mod common;
pub mod division;
pub mod elimination;
pub mod error;
pub mod max_flow;
pub mod network;
pub mod parse;
pub mod report;

pub use common::{Capacity, TeamIdx, INFINITE};
pub use division::{Division, Inconsistency, TeamRecord};
pub use elimination::{extract_certificate, trivial_elimination, Certificate, Eliminator};
pub use error::{DivisionError, ParseError, UnknownTeam};
pub use max_flow::{Algorithm, EdmondsKarp, FattestPath, FlowOutcome, FordFulkerson, MaxFlow};
pub use network::{build_elimination_network, FlowEdge, FlowNetwork, Vertex};
pub use parse::parse_division;
pub use report::{EliminationReport, TeamStatus};
