pub mod config;
pub mod genome;
pub mod identity;
pub mod random_provider;
pub mod statistics;

pub use config::SimulationConfig;
pub use genome::{
    AestheticBias, Domain, DomainGenes, EngineGenes, FitnessVector, Genome, LimboGenes, LogsGenes,
    MutationKind, MutationRecord, OdysseyGenes, OdysseyNumeric, RitualGenes,
};
pub use identity::{Identity, PersonalityArchetype};
pub use statistics::{Adder, Statistic};

pub use weave_error::{WeaveError, WeaveResult};
pub use weave_utils::{Arena, ArenaKey, SmallStr};
