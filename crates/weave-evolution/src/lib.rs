//! Fitness aggregation, selection, crossover, mutation and generation
//! advance for the digital-society simulation's evolutionary core.

pub mod crossover;
pub mod fitness;
pub mod generation;
pub mod mutation;
pub mod selection;

pub use crossover::crossover;
pub use fitness::{
    calculate_fitness, EngineSignals, LimboSignals, LogsSignals, OdysseySignals, PerformanceData,
    RitualSignals,
};
pub use generation::evolve;
pub use mutation::mutate;
pub use selection::{select_parents, tournament_select};
