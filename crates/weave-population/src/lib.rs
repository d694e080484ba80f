//! The population manager: cohort ownership, cycle and generation
//! control, and the persistence sink contract.

pub mod persistence;
pub mod population;
pub mod stats;

pub use persistence::{
    EventRecord, FitnessRecord, GenerationStatsRecord, GenomeRecord, IdentityRecord, InMemorySink,
    PersistenceSink,
};
pub use population::{PopulationManager, PopulationSummary, TopAgent, WalletState};
pub use stats::{compute_generation_stats, GenerationStats, TraitDistribution};

/// Installs a global `tracing` subscriber (compact formatter, span
/// enter/exit events) and a panic hook that logs through `tracing`
/// instead of writing straight to stderr. Idempotent; safe to call from
/// every binary entry point and from tests.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::fmt::format::FmtSpan;
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        std::panic::set_hook(Box::new(|info| {
            tracing::error!("PANIC: {}", info);
        }));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
