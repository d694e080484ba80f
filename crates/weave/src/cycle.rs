use weave_agent::SocialAgent;
use weave_core::Domain;
use weave_evolution::fitness::{
    EngineSignals, LimboSignals, LogsSignals, OdysseySignals, PerformanceData, RitualSignals,
};
use weave_social::SocialNetworkManager;

/// Bridges one round's social behaviour into the performance signals
/// `weave_evolution::calculate_fitness` expects: each domain's
/// accumulated `DomainPerformance` bonus (from direct social
/// interaction) plus any active transient event bonus feeds the most
/// representative signal in that domain's group; the other two signals
/// in each group are left unset, defaulting to neutral per
/// `calculate_fitness`'s own aggregation rule.
pub fn derive_performance_data(agent: &SocialAgent, social: &SocialNetworkManager) -> PerformanceData {
    let score = |domain: Domain, base: f32| -> f32 {
        (base + social.active_bonus(agent.id(), domain)).clamp(0.0, 1.0)
    };

    PerformanceData {
        limbo: LimboSignals {
            profit_ratio: Some(score(Domain::Limbo, agent.performance.limbo)),
            ..Default::default()
        },
        odyssey: OdysseySignals {
            popularity_score: Some(score(Domain::Odyssey, agent.performance.odyssey)),
            ..Default::default()
        },
        ritual: RitualSignals {
            social_influence: Some(score(Domain::Ritual, agent.performance.ritual)),
            ..Default::default()
        },
        engine: EngineSignals {
            prediction_accuracy: Some(score(Domain::Engine, agent.performance.engine)),
            ..Default::default()
        },
        logs: LogsSignals {
            delivery_satisfaction: Some(score(Domain::Logs, agent.performance.logs)),
            ..Default::default()
        },
    }
}
