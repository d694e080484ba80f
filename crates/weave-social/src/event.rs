use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_agent::SocialAgent;
use weave_core::{random_provider, Domain};
use weave_graph::{metrics_of, EdgeType, NeuralWeb};
use weave_utils::SmallStr;

/// The seven social-event kinds a round may generate, drawn uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    TrendEmergence,
    CommunityGathering,
    InfluenceCampaign,
    CompetitiveChallenge,
    CollaborativeProject,
    SocialCrisis,
    InnovationWave,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::TrendEmergence,
        EventKind::CommunityGathering,
        EventKind::InfluenceCampaign,
        EventKind::CompetitiveChallenge,
        EventKind::CollaborativeProject,
        EventKind::SocialCrisis,
        EventKind::InnovationWave,
    ];
}

/// A performance bonus granted to one agent in one domain for a bounded
/// number of remaining rounds, tagged for reporting. Tracked separately
/// from `DomainPerformance` (which accrues from direct social behaviour)
/// so event effects stay a pure, read-composable overlay rather than
/// entangled state that double-counts across rounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransientBonus {
    pub tag: SmallStr,
    pub domain: Domain,
    pub amount: f32,
    pub rounds_remaining: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SocialEvent {
    pub kind: EventKind,
    pub participants: Vec<SmallStr>,
    pub intensity: f32,
    pub description: SmallStr,
    pub occurred_at: DateTime<Utc>,
}

fn intensity_band(intensity: f32) -> &'static str {
    if intensity > 0.7 {
        "high impact"
    } else if intensity > 0.4 {
        "moderate impact"
    } else {
        "low impact"
    }
}

fn describe(kind: EventKind, intensity: f32) -> SmallStr {
    let label = match kind {
        EventKind::TrendEmergence => "trend_emergence",
        EventKind::CommunityGathering => "community_gathering",
        EventKind::InfluenceCampaign => "influence_campaign",
        EventKind::CompetitiveChallenge => "competitive_challenge",
        EventKind::CollaborativeProject => "collaborative_project",
        EventKind::SocialCrisis => "social_crisis",
        EventKind::InnovationWave => "innovation_wave",
    };
    SmallStr::from(format!("{label} ({})", intensity_band(intensity)))
}

fn select_participants(kind: EventKind, agents: &[SocialAgent]) -> Vec<SmallStr> {
    let eligible: Vec<SmallStr> = agents
        .iter()
        .filter(|agent| match kind {
            EventKind::TrendEmergence => {
                agent.working_genes.ritual.leadership_tendency > 0.6
                    || agent.working_genes.odyssey.creativity_drive > 0.7
            }
            EventKind::CommunityGathering => agent.working_genes.ritual.community_bonding > 0.5,
            EventKind::InfluenceCampaign => agent.working_genes.ritual.leadership_tendency > 0.5,
            EventKind::CompetitiveChallenge => agent.working_genes.limbo.risk_tolerance > 0.5,
            EventKind::CollaborativeProject => agent.working_genes.ritual.community_bonding > 0.4,
            EventKind::SocialCrisis => agent.working_genes.ritual.influence_susceptibility > 0.5,
            EventKind::InnovationWave => agent.working_genes.odyssey.innovation_appetite > 0.5,
        })
        .map(|agent| SmallStr::from(agent.id()))
        .collect();

    let sample_size = 3.min(eligible.len());
    if eligible.len() <= sample_size {
        return eligible;
    }
    random_provider::sample_indices(0..eligible.len(), sample_size)
        .into_iter()
        .map(|i| eligible[i].clone())
        .collect()
}

fn intensity_of(participants: &[SmallStr], web: &NeuralWeb) -> f32 {
    if participants.is_empty() {
        return 0.0;
    }
    let mean_influence = participants
        .iter()
        .map(|id| metrics_of(web, id).influence_score)
        .sum::<f32>()
        / participants.len() as f32;
    mean_influence.min(1.0)
}

/// Draws a uniformly random event kind, selects its participants by its
/// kind-specific predicate, computes intensity, and applies its effects:
/// a tagged transient performance bonus for five of the seven kinds, and
/// a direct edge-strength adjustment for the other two
/// (`community_gathering` strengthens, `social_crisis` weakens every
/// pairwise edge among participants).
pub fn generate_event(
    agents: &[SocialAgent],
    web: &mut NeuralWeb,
    bonuses: &mut Vec<(SmallStr, TransientBonus)>,
) -> Option<SocialEvent> {
    let kind = *random_provider::choose(&EventKind::ALL);
    let participants = select_participants(kind, agents);
    if participants.is_empty() {
        return None;
    }

    let intensity = intensity_of(&participants, web);

    match kind {
        EventKind::TrendEmergence => {
            let amount = intensity * 0.1;
            let duration = random_provider::range(2u32..6u32);
            let domain = *random_provider::choose(&[Domain::Limbo, Domain::Odyssey, Domain::Ritual]);
            let tag = format!("trend_{}", domain.name());
            push_bonus(bonuses, &participants, &tag, domain, amount, duration);
        }
        EventKind::CommunityGathering => {
            let boost = intensity * 0.15;
            adjust_pairwise_edges(web, &participants, boost);
        }
        EventKind::InfluenceCampaign => {
            let reach_bonus = intensity * 0.2;
            boost_influence_edges(web, &participants, reach_bonus);
        }
        EventKind::CompetitiveChallenge => {
            let amount = intensity * 0.2;
            push_bonus(bonuses, &participants, "challenge_limbo", Domain::Limbo, amount, 3);
        }
        EventKind::CollaborativeProject => {
            let amount = intensity * 0.1;
            push_bonus(bonuses, &participants, "collaboration", Domain::Ritual, amount, 3);
        }
        EventKind::SocialCrisis => {
            let strain = intensity * 0.2;
            adjust_pairwise_edges(web, &participants, -strain);
        }
        EventKind::InnovationWave => {
            let amount = intensity * 0.15;
            push_bonus(bonuses, &participants, "trend_odyssey", Domain::Odyssey, amount, 3);
        }
    }

    Some(SocialEvent {
        kind,
        participants,
        intensity,
        description: describe(kind, intensity),
        occurred_at: Utc::now(),
    })
}

fn push_bonus(
    bonuses: &mut Vec<(SmallStr, TransientBonus)>,
    participants: &[SmallStr],
    tag: &str,
    domain: Domain,
    amount: f32,
    duration_rounds: u32,
) {
    for agent_id in participants {
        bonuses.push((
            agent_id.clone(),
            TransientBonus {
                tag: SmallStr::from(tag),
                domain,
                amount,
                rounds_remaining: duration_rounds,
            },
        ));
    }
}

fn adjust_pairwise_edges(web: &mut NeuralWeb, participants: &[SmallStr], delta: f32) {
    for a in participants {
        for b in participants {
            if a == b {
                continue;
            }
            if let Some(edge) = web.edge_mut(a.as_str(), b.as_str()) {
                edge.strength = (edge.strength + delta).clamp(0.0, 1.0);
            }
        }
    }
}

fn boost_influence_edges(web: &mut NeuralWeb, participants: &[SmallStr], amount: f32) {
    for agent_id in participants {
        let targets: Vec<SmallStr> = web
            .outgoing(agent_id.as_str())
            .filter(|(_, edge)| matches!(edge.edge_type, EdgeType::Influencer | EdgeType::Mentor))
            .map(|(id, _)| id.clone())
            .collect();
        for target in targets {
            if let Some(edge) = web.edge_mut(agent_id.as_str(), target.as_str()) {
                edge.strength = (edge.strength + amount).clamp(0.0, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Genome;

    #[test]
    fn community_gathering_strengthens_every_pairwise_edge() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        web.edge_mut("a", "b").unwrap().strength = 0.5;
        web.edge_mut("b", "a").unwrap().strength = 0.5;

        let participants = vec![SmallStr::from("a"), SmallStr::from("b")];
        adjust_pairwise_edges(&mut web, &participants, 0.1);

        assert!((web.edge("a", "b").unwrap().strength - 0.6).abs() < 1e-6);
        assert!((web.edge("b", "a").unwrap().strength - 0.6).abs() < 1e-6);
    }

    #[test]
    fn intensity_band_labels_match_thresholds() {
        assert_eq!(intensity_band(0.9), "high impact");
        assert_eq!(intensity_band(0.5), "moderate impact");
        assert_eq!(intensity_band(0.1), "low impact");
    }
}
