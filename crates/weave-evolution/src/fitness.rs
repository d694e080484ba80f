use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use weave_core::{FitnessVector, Genome};

/// Per-domain raw performance signals an upstream system reports for one
/// agent between generation advances. Any field left unset defaults to
/// 0.5, per the aggregation rule's literal "missing inputs default to
/// 0.5" clause — including `limbo.profit_ratio`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PerformanceData {
    pub limbo: LimboSignals,
    pub odyssey: OdysseySignals,
    pub ritual: RitualSignals,
    pub engine: EngineSignals,
    pub logs: LogsSignals,
}

macro_rules! signal_group {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: Option<f32>),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $($field: None),+ }
            }
        }
    };
}

signal_group!(LimboSignals {
    profit_ratio,
    decision_accuracy,
    market_timing,
});

signal_group!(OdysseySignals {
    creativity_score,
    popularity_score,
    innovation_score,
});

signal_group!(RitualSignals {
    community_engagement,
    social_influence,
    subscription_satisfaction,
});

signal_group!(EngineSignals {
    prediction_accuracy,
    analysis_quality,
    ai_contributions,
});

signal_group!(LogsSignals {
    delivery_satisfaction,
    operational_efficiency,
    problem_resolution,
});

const MISSING_DEFAULT: f32 = 0.5;

fn weighted(a: Option<f32>, wa: f32, b: Option<f32>, wb: f32, c: Option<f32>, wc: f32) -> f32 {
    let a = a.unwrap_or(MISSING_DEFAULT);
    let b = b.unwrap_or(MISSING_DEFAULT);
    let c = c.unwrap_or(MISSING_DEFAULT);
    (wa * a + wb * b + wc * c).clamp(0.0, 1.0)
}

/// A pure function of `(performance_data)` producing an updated fitness
/// vector; callers replace the genome's `fitness` with the result.
pub fn calculate_fitness(data: &PerformanceData) -> FitnessVector {
    let limbo = weighted(
        data.limbo.profit_ratio,
        0.4,
        data.limbo.decision_accuracy,
        0.3,
        data.limbo.market_timing,
        0.3,
    );
    let odyssey = weighted(
        data.odyssey.creativity_score,
        0.4,
        data.odyssey.popularity_score,
        0.3,
        data.odyssey.innovation_score,
        0.3,
    );
    let ritual = weighted(
        data.ritual.community_engagement,
        0.4,
        data.ritual.social_influence,
        0.3,
        data.ritual.subscription_satisfaction,
        0.3,
    );
    let engine = weighted(
        data.engine.prediction_accuracy,
        0.4,
        data.engine.analysis_quality,
        0.3,
        data.engine.ai_contributions,
        0.3,
    );
    let logs = weighted(
        data.logs.delivery_satisfaction,
        0.4,
        data.logs.operational_efficiency,
        0.3,
        data.logs.problem_resolution,
        0.3,
    );

    let overall =
        (0.25 * limbo + 0.20 * odyssey + 0.25 * ritual + 0.15 * engine + 0.15 * logs).clamp(0.0, 1.0);

    FitnessVector {
        limbo,
        odyssey,
        ritual,
        engine,
        logs,
        overall,
    }
}

/// Re-scores an entire cohort against freshly gathered performance data,
/// one `PerformanceData` entry per agent in cohort order. Evaluation is
/// embarrassingly parallel across agents, so it runs on the rayon global
/// pool; the returned `FitnessVector`s are in the same order as `cohort`.
pub fn evaluate_cohort(cohort: &[Genome], data: &[PerformanceData]) -> Vec<FitnessVector> {
    debug_assert_eq!(cohort.len(), data.len(), "one performance entry per agent");
    data.par_iter().map(calculate_fitness).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_missing_inputs_yield_neutral_fitness() {
        let fitness = calculate_fitness(&PerformanceData::default());
        assert_eq!(fitness.limbo, 0.5);
        assert_eq!(fitness.odyssey, 0.5);
        assert_eq!(fitness.ritual, 0.5);
        assert_eq!(fitness.engine, 0.5);
        assert_eq!(fitness.logs, 0.5);
        assert_eq!(fitness.overall, 0.5);
    }

    #[test]
    fn perfect_inputs_saturate_to_one() {
        let data = PerformanceData {
            limbo: LimboSignals {
                profit_ratio: Some(1.0),
                decision_accuracy: Some(1.0),
                market_timing: Some(1.0),
            },
            odyssey: OdysseySignals {
                creativity_score: Some(1.0),
                popularity_score: Some(1.0),
                innovation_score: Some(1.0),
            },
            ritual: RitualSignals {
                community_engagement: Some(1.0),
                social_influence: Some(1.0),
                subscription_satisfaction: Some(1.0),
            },
            engine: EngineSignals {
                prediction_accuracy: Some(1.0),
                analysis_quality: Some(1.0),
                ai_contributions: Some(1.0),
            },
            logs: LogsSignals {
                delivery_satisfaction: Some(1.0),
                operational_efficiency: Some(1.0),
                problem_resolution: Some(1.0),
            },
        };
        let fitness = calculate_fitness(&data);
        assert_eq!(fitness.overall, 1.0);
    }

    #[test]
    fn evaluate_cohort_matches_per_agent_calculation() {
        let cohort: Vec<Genome> = (0..4)
            .map(|i| Genome::random(format!("agent-{i}"), "genesis"))
            .collect();
        let data: Vec<PerformanceData> = (0..4)
            .map(|i| PerformanceData {
                limbo: LimboSignals {
                    profit_ratio: Some(i as f32 / 3.0),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect();

        let scored = evaluate_cohort(&cohort, &data);
        for (i, fitness) in scored.iter().enumerate() {
            assert_eq!(*fitness, calculate_fitness(&data[i]));
        }
    }

    #[test]
    fn bounded_for_any_input_in_range() {
        let data = PerformanceData {
            limbo: LimboSignals {
                profit_ratio: Some(0.3),
                decision_accuracy: Some(0.9),
                market_timing: None,
            },
            ..Default::default()
        };
        let fitness = calculate_fitness(&data);
        for value in [
            fitness.limbo,
            fitness.odyssey,
            fitness.ritual,
            fitness.engine,
            fitness.logs,
            fitness.overall,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
