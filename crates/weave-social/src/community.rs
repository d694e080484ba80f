use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_agent::{derive_goals, SocialGoal};
use weave_core::{random_provider, Genome};
use weave_graph::{metrics_of, Community, NeuralWeb};
use weave_utils::SmallStr;

/// A living community's tracked state across rounds. Identity is derived
/// from its current member set (§ design decision: member-set equality
/// stands in for a stable id, since the spec only requires that an
/// unchanged membership keep an unchanged assignment).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommunityState {
    pub key: SmallStr,
    pub members: Vec<SmallStr>,
    pub leader: SmallStr,
    pub shared_values: HashMap<String, f32>,
    pub collective_goals: Vec<String>,
    pub cohesion: f32,
    pub activity_level: f32,
    pub formation_time: DateTime<Utc>,
}

fn community_key(members: &[SmallStr]) -> SmallStr {
    let mut ids: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
    ids.sort_unstable();
    SmallStr::from(ids.join(","))
}

/// Ranks members by `0.6*leadership_tendency + 0.4*influence_score`,
/// ties broken by `agent_id` lexical order.
fn elect_leader(members: &[SmallStr], cohort: &[Genome], web: &NeuralWeb) -> SmallStr {
    members
        .iter()
        .max_by(|a, b| {
            let score = |id: &SmallStr| -> f32 {
                let leadership = cohort
                    .iter()
                    .find(|g| g.agent_id.as_str() == id.as_str())
                    .map(|g| g.domains.ritual.leadership_tendency)
                    .unwrap_or(0.0);
                let influence = metrics_of(web, id.as_str()).influence_score;
                0.6 * leadership + 0.4 * influence
            };
            score(a)
                .total_cmp(&score(b))
                .then_with(|| b.as_str().cmp(a.as_str()))
        })
        .cloned()
        .unwrap_or_else(|| members[0].clone())
}

fn shared_values(members: &[SmallStr], cohort: &[Genome]) -> HashMap<String, f32> {
    let genomes: Vec<&Genome> = members
        .iter()
        .filter_map(|id| cohort.iter().find(|g| g.agent_id.as_str() == id.as_str()))
        .collect();
    if genomes.is_empty() {
        return HashMap::new();
    }

    let mut sums: HashMap<String, f32> = HashMap::new();
    for genome in &genomes {
        for (domain, trait_name, value) in genome.domains.numeric_traits() {
            *sums.entry(format!("{}_{}", domain.name(), trait_name)).or_insert(0.0) += value;
        }
    }
    for value in sums.values_mut() {
        *value /= genomes.len() as f32;
    }
    sums
}

fn collective_goals(members: &[SmallStr], cohort: &[Genome], shared: &HashMap<String, f32>) -> Vec<String> {
    let genomes: Vec<&Genome> = members
        .iter()
        .filter_map(|id| cohort.iter().find(|g| g.agent_id.as_str() == id.as_str()))
        .collect();
    if genomes.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<SocialGoal, usize> = HashMap::new();
    for genome in &genomes {
        for goal in derive_goals(genome) {
            *counts.entry(goal).or_insert(0) += 1;
        }
    }

    let threshold = genomes.len() as f32 / 2.0;
    let mut goals: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count as f32 > threshold)
        .map(|(goal, _)| format!("{goal:?}"))
        .collect();

    if shared.get("ritual_community_bonding").copied().unwrap_or(0.0) > 0.7 {
        goals.push("strengthen_community_bonds".to_string());
    }
    if shared.get("odyssey_creativity_drive").copied().unwrap_or(0.0) > 0.7 {
        goals.push("foster_collective_creativity".to_string());
    }
    if shared.get("limbo_risk_tolerance").copied().unwrap_or(0.0) > 0.7 {
        goals.push("pursue_bold_ventures".to_string());
    }

    goals
}

/// `cohesion = 0.6*density + 0.4*mean_edge_strength` over intra-community
/// edges; singletons (size 1, which `detect_communities` never actually
/// returns) are defined as 1.0 for completeness.
fn cohesion(members: &[SmallStr], web: &NeuralWeb) -> f32 {
    let m = members.len();
    if m <= 1 {
        return 1.0;
    }

    let mut present = 0usize;
    let mut strength_sum = 0.0f32;
    for a in members {
        for b in members {
            if a == b {
                continue;
            }
            if let Some(edge) = web.edge(a.as_str(), b.as_str()) {
                present += 1;
                strength_sum += edge.strength;
            }
        }
    }

    let density = present as f32 / (m * (m - 1)) as f32;
    let mean_strength = if present == 0 { 0.0 } else { strength_sum / present as f32 };
    0.6 * density + 0.4 * mean_strength
}

/// Sum of `interaction_count` over intra-community edges whose
/// `last_interaction` fell within the last 7 days, normalised by `10*m`
/// and clamped to 1.0.
fn activity_level(members: &[SmallStr], web: &NeuralWeb) -> f32 {
    let m = members.len();
    if m == 0 {
        return 0.0;
    }
    let cutoff = Utc::now() - chrono::Duration::days(7);

    let mut total = 0u32;
    for a in members {
        for b in members {
            if a == b {
                continue;
            }
            if let Some(edge) = web.edge(a.as_str(), b.as_str()) {
                if edge.last_interaction.map(|t| t >= cutoff).unwrap_or(false) {
                    total += edge.interaction_count;
                }
            }
        }
    }

    (total as f32 / (10.0 * m as f32)).min(1.0)
}

/// Re-derives communities from the graph and reconciles them against the
/// previous round's registry: new member-sets are formed (leader
/// election, shared values, collective goals, formation time recorded),
/// persisting member-sets are refreshed (cohesion/activity recomputed,
/// 10% chance to re-elect the leader), and member-sets absent from the
/// current detection are dropped.
pub fn evolve_communities(
    registry: &mut HashMap<SmallStr, CommunityState>,
    detected: &[Community],
    cohort: &[Genome],
    web: &NeuralWeb,
) {
    let mut seen_keys = Vec::with_capacity(detected.len());

    for community in detected {
        let key = community_key(&community.members);
        seen_keys.push(key.clone());

        if let Some(state) = registry.get_mut(&key) {
            state.members = community.members.clone();
            state.cohesion = cohesion(&community.members, web);
            state.activity_level = activity_level(&community.members, web);
            if random_provider::bool(0.1) {
                state.leader = elect_leader(&community.members, cohort, web);
            }
        } else {
            let leader = elect_leader(&community.members, cohort, web);
            let shared = shared_values(&community.members, cohort);
            let goals = collective_goals(&community.members, cohort, &shared);
            registry.insert(
                key.clone(),
                CommunityState {
                    key: key.clone(),
                    members: community.members.clone(),
                    leader,
                    shared_values: shared,
                    collective_goals: goals,
                    cohesion: cohesion(&community.members, web),
                    activity_level: activity_level(&community.members, web),
                    formation_time: Utc::now(),
                },
            );
        }
    }

    registry.retain(|key, _| seen_keys.contains(key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_graph::EdgeType;

    #[test]
    fn community_key_is_order_independent() {
        let a = vec![SmallStr::from("b"), SmallStr::from("a")];
        let b = vec![SmallStr::from("a"), SmallStr::from("b")];
        assert_eq!(community_key(&a), community_key(&b));
    }

    #[test]
    fn new_community_is_formed_with_leader_and_shared_values() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        web.edge_mut("a", "b").unwrap().strength = 0.9;
        web.edge_mut("b", "a").unwrap().strength = 0.9;

        let cohort = vec![a, b];
        let detected = weave_graph::detect_communities(&web);
        let mut registry = HashMap::new();
        evolve_communities(&mut registry, &detected, &cohort, &web);

        assert_eq!(registry.len(), 1);
        let state = registry.values().next().unwrap();
        assert_eq!(state.members.len(), 2);
        assert_eq!(state.shared_values.len(), 24);
    }

    #[test]
    fn dissolved_community_is_dropped_from_registry() {
        let mut registry = HashMap::new();
        registry.insert(
            SmallStr::from("a,b"),
            CommunityState {
                key: SmallStr::from("a,b"),
                members: vec![SmallStr::from("a"), SmallStr::from("b")],
                leader: SmallStr::from("a"),
                shared_values: HashMap::new(),
                collective_goals: Vec::new(),
                cohesion: 1.0,
                activity_level: 0.0,
                formation_time: Utc::now(),
            },
        );
        let web = NeuralWeb::new();
        evolve_communities(&mut registry, &[], &[], &web);
        assert!(registry.is_empty());
    }
}
