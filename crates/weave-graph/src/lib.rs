//! The neural web: a typed, weighted, directional social graph between
//! agents, with genetic-compatibility scoring, interaction-driven
//! strength updates, influence propagation and community detection.

pub mod community;
pub mod compatibility;
pub mod edge;
pub mod graph;
pub mod influence;
pub mod metrics;

pub use community::{detect_communities, Community};
pub use compatibility::genetic_compatibility;
pub use edge::{EdgeType, InteractionKind};
pub use graph::{Edge, InfluenceEvent, NeuralWeb};
pub use influence::influence_reach;
pub use metrics::{metrics_of, network_statistics, NetworkStatistics, SocialMetrics};
