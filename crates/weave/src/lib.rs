//! The synchronous, in-process simulation API: genesis, per-tick
//! cycle control, graph queries and the social-event surface, built by
//! composing the population manager and the social network manager
//! around a shared cohort.

pub mod cycle;
pub mod report;

pub use cycle::derive_performance_data;
pub use report::{build_report, SocialReport};
pub use weave_population::{init_logging, PersistenceSink};

use chrono::Duration;
use weave_agent::SocialAgent;
use weave_core::{Genome, Identity, SimulationConfig};
use weave_error::WeaveResult;
use weave_graph::{detect_communities, metrics_of, Community, Edge, SocialMetrics};
use weave_population::PopulationManager;
use weave_social::{SocialEvent, SocialNetworkManager, Trends};
use weave_utils::SmallStr;

/// Owns the living cohort and the social graph it interacts through,
/// one tick at a time: `F.simulate_round` drives the neural web, then
/// `E.advance_cycle` re-scores fitness from that round's outcome and
/// triggers a generation advance at the configured boundary.
pub struct Simulation<S: PersistenceSink> {
    pub population: PopulationManager<S>,
    pub social: SocialNetworkManager,
}

impl<S: PersistenceSink> Simulation<S> {
    /// Validates `config`, then genesis a fresh generation-0 cohort.
    pub fn genesis(config: SimulationConfig, sink: S) -> WeaveResult<Self> {
        let config = config.validated()?;
        Ok(Simulation {
            population: PopulationManager::genesis(config, sink),
            social: SocialNetworkManager::new(config.event_probability),
        })
    }

    pub fn current_generation(&self) -> u64 {
        self.population.generation
    }

    pub fn get_cohort(&self) -> impl Iterator<Item = (&Identity, &Genome)> {
        self.population.agents.iter().map(|agent| (&agent.identity, &agent.genome))
    }

    pub fn get_agent(&self, agent_id: &str) -> Option<&SocialAgent> {
        self.population.agent(agent_id)
    }

    /// One simulation tick: a social round over the full cohort,
    /// performance derived from that round's outcome, and a population
    /// cycle advance (which rebuilds the cohort at a generation
    /// boundary).
    pub fn run_cycle(&mut self) {
        self.social.run_round(&mut self.population.agents);

        let performance: Vec<_> = self
            .population
            .agents
            .iter()
            .map(|agent| derive_performance_data(agent, &self.social))
            .collect();
        self.population.run_cycle(&performance);
    }

    pub fn run_rounds(&mut self, n: usize) {
        for _ in 0..n {
            self.run_cycle();
        }
    }

    pub fn force_generation_advance(&mut self) {
        self.population.advance_generation();
    }

    pub fn connections_of(&self, agent_id: &str) -> Vec<(SmallStr, Edge)> {
        self.social.web.outgoing(agent_id).map(|(id, edge)| (id.clone(), edge.clone())).collect()
    }

    pub fn connection(&self, source_id: &str, target_id: &str) -> Option<&Edge> {
        self.social.web.edge(source_id, target_id)
    }

    pub fn detect_communities(&self) -> Vec<Community> {
        detect_communities(&self.social.web)
    }

    pub fn metrics_of(&self, agent_id: &str) -> SocialMetrics {
        metrics_of(&self.social.web, agent_id)
    }

    pub fn recent_events(&self, window: Duration) -> Vec<&SocialEvent> {
        self.social.recent_events(window)
    }

    pub fn trends(&self) -> &Trends {
        &self.social.trends
    }

    /// The supplemental dashboard rollup: network statistics, per-agent
    /// social summaries, community analysis, recent events, top
    /// influencers and current trends.
    pub fn social_report(&self) -> SocialReport {
        build_report(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_population::InMemorySink;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            population_size: 8,
            generation_cycles: 3,
            tournament_size: 3,
            event_probability: 0.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn genesis_rejects_invalid_configuration() {
        let config = SimulationConfig { population_size: 0, ..SimulationConfig::default() };
        assert!(Simulation::genesis(config, InMemorySink::default()).is_err());
    }

    #[test]
    fn a_tick_registers_every_agent_in_the_graph() {
        let mut sim = Simulation::genesis(small_config(), InMemorySink::default()).unwrap();
        sim.run_cycle();
        assert_eq!(sim.social.web.agent_count(), 8);
        assert_eq!(sim.current_generation(), 0);
    }

    #[test]
    fn running_enough_cycles_advances_the_generation() {
        let mut sim = Simulation::genesis(small_config(), InMemorySink::default()).unwrap();
        sim.run_rounds(3);
        assert_eq!(sim.current_generation(), 1);
        assert_eq!(sim.get_cohort().count(), 8);
    }

    #[test]
    fn social_report_covers_the_whole_cohort() {
        let mut sim = Simulation::genesis(small_config(), InMemorySink::default()).unwrap();
        sim.run_cycle();
        let report = sim.social_report();
        assert_eq!(report.agent_summaries.len(), 8);
        assert!(report.top_by_influence.len() <= 8);
    }
}
