use chrono::Duration;
use weave_agent::{get_social_summary, SocialSummary};
use weave_graph::{metrics_of, network_statistics, NetworkStatistics};
use weave_social::{CommunityState, SocialEvent, Trends};
use weave_utils::SmallStr;

use weave_population::PersistenceSink;

use crate::Simulation;

/// A point-in-time rollup for dashboards: network-wide statistics, a
/// per-agent social summary, every tracked community, the last 24
/// hours of social events, the top 10 agents by influence score, and
/// the current trend snapshot.
pub struct SocialReport {
    pub network: NetworkStatistics,
    pub agent_summaries: Vec<SocialSummary>,
    pub communities: Vec<CommunityState>,
    pub recent_events: Vec<SocialEvent>,
    pub top_by_influence: Vec<(SmallStr, f32)>,
    pub trends: Trends,
}

pub fn build_report<S: PersistenceSink>(simulation: &Simulation<S>) -> SocialReport {
    let web = &simulation.social.web;

    let network = network_statistics(web);

    let agent_summaries = simulation
        .population
        .agents
        .iter()
        .map(|agent| get_social_summary(agent, web))
        .collect();

    let communities = simulation.social.communities.values().cloned().collect();

    let recent_events = simulation
        .social
        .recent_events(Duration::hours(24))
        .into_iter()
        .cloned()
        .collect();

    let mut top_by_influence: Vec<(SmallStr, f32)> = simulation
        .population
        .agents
        .iter()
        .map(|agent| (SmallStr::from(agent.id()), metrics_of(web, agent.id()).influence_score))
        .collect();
    top_by_influence.sort_by(|a, b| b.1.total_cmp(&a.1));
    top_by_influence.truncate(10);

    SocialReport {
        network,
        agent_summaries,
        communities,
        recent_events,
        top_by_influence,
        trends: simulation.social.trends.clone(),
    }
}
