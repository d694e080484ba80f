use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use weave_core::PersonalityArchetype;
use weave_graph::{EdgeType, NeuralWeb};

const EMA_WEIGHT: f32 = 0.2;

/// Fractional distributions and activity proxy, tracked as an
/// exponential moving average across rounds:
/// `trend[k] <- 0.8*trend[k] + 0.2*observation[k]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trends {
    pub edge_type_distribution: HashMap<String, f32>,
    pub archetype_distribution: HashMap<String, f32>,
    pub social_activity_level: f32,
}

impl Trends {
    fn ema_update(current: &mut HashMap<String, f32>, observation: &HashMap<String, f32>) {
        let mut keys: Vec<&String> = current.keys().chain(observation.keys()).collect();
        keys.sort_unstable();
        keys.dedup();
        for key in keys {
            let prev = current.get(key).copied().unwrap_or(0.0);
            let obs = observation.get(key).copied().unwrap_or(0.0);
            current.insert(key.clone(), (1.0 - EMA_WEIGHT) * prev + EMA_WEIGHT * obs);
        }
    }

    pub fn update(&mut self, edge_observation: &HashMap<String, f32>, archetype_observation: &HashMap<String, f32>, activity_observation: f32) {
        Self::ema_update(&mut self.edge_type_distribution, edge_observation);
        Self::ema_update(&mut self.archetype_distribution, archetype_observation);
        self.social_activity_level =
            (1.0 - EMA_WEIGHT) * self.social_activity_level + EMA_WEIGHT * activity_observation;
    }
}

pub fn edge_type_observation(web: &NeuralWeb) -> HashMap<String, f32> {
    let mut counts: HashMap<EdgeType, usize> = HashMap::new();
    let mut total = 0usize;
    for agent_id in web.agent_ids() {
        for (_, edge) in web.outgoing(agent_id) {
            *counts.entry(edge.edge_type).or_insert(0) += 1;
            total += 1;
        }
    }

    EdgeType::ALL
        .iter()
        .map(|edge_type| {
            let fraction = if total == 0 {
                0.0
            } else {
                *counts.get(edge_type).unwrap_or(&0) as f32 / total as f32
            };
            (format!("{edge_type:?}"), fraction)
        })
        .collect()
}

pub fn archetype_observation(archetypes: &[PersonalityArchetype]) -> HashMap<String, f32> {
    let total = archetypes.len();
    let mut counts: HashMap<PersonalityArchetype, usize> = HashMap::new();
    for archetype in archetypes {
        *counts.entry(*archetype).or_insert(0) += 1;
    }

    PersonalityArchetype::ALL
        .iter()
        .map(|archetype| {
            let fraction = if total == 0 {
                0.0
            } else {
                *counts.get(archetype).unwrap_or(&0) as f32 / total as f32
            };
            (archetype.name().to_string(), fraction)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_blends_toward_new_observations_gradually() {
        let mut trends = Trends::default();
        let mut observation = HashMap::new();
        observation.insert("Friend".to_string(), 1.0);
        trends.update(&observation, &HashMap::new(), 0.5);
        assert!((trends.edge_type_distribution["Friend"] - 0.2).abs() < 1e-6);

        trends.update(&observation, &HashMap::new(), 0.5);
        assert!((trends.edge_type_distribution["Friend"] - 0.36).abs() < 1e-6);
    }
}
