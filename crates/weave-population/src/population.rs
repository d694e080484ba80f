use chrono::{DateTime, Utc};
use weave_agent::SocialAgent;
use weave_core::{random_provider, Genome, PersonalityArchetype, SimulationConfig, Statistic};
use weave_error::WeaveResult;
use weave_evolution::{evolve, fitness::PerformanceData};
use weave_utils::SmallStr;

use crate::persistence::{
    EventRecord, FitnessRecord, GenerationStatsRecord, GenomeRecord, IdentityRecord, PersistenceSink,
};
use crate::stats::{compute_generation_stats, GenerationStats};

/// The synthetic attributes the original population model tracks outside
/// the genome proper, parallel to `PopulationManager::agents` by index: a
/// wallet balance that carries forward (with noise) across generation
/// advances, and a sentiment score that is always redrawn fresh.
#[derive(Clone, Copy)]
pub struct WalletState {
    pub wallet_balance: f32,
    pub sentiment: f32,
}

impl WalletState {
    fn genesis() -> Self {
        WalletState {
            wallet_balance: random_provider::range(500.0f32..1500.0f32),
            sentiment: random_provider::range(0.3f32..0.7f32),
        }
    }
}

/// Owns the living cohort, drives per-cycle and per-generation advance,
/// and relays every persisted record through an injected
/// [`PersistenceSink`]. A sink failure is logged and the round continues;
/// the next scheduled snapshot re-persists so nothing is lost permanently.
///
/// `agents` is kept as a plain `Vec<SocialAgent>` (rather than wrapped in a
/// cohort-local struct) so callers driving the social network's round loop
/// can borrow it directly as `&mut [SocialAgent]`; `wallets` carries the
/// parallel, non-genomic state at the same index.
pub struct PopulationManager<S: PersistenceSink> {
    pub config: SimulationConfig,
    pub agents: Vec<SocialAgent>,
    pub wallets: Vec<WalletState>,
    pub generation: u64,
    pub cycle_count: u64,
    pub last_evolution_at: Option<DateTime<Utc>>,
    pub last_generation_stats: Option<GenerationStats>,
    sink: S,
}

impl<S: PersistenceSink> PopulationManager<S> {
    /// Genesis: `config.population_size` fresh generation-0 agents with
    /// random genomes, random wallets in `[500, 1500]` and random
    /// sentiment in `[0.3, 0.7]`.
    pub fn genesis(config: SimulationConfig, sink: S) -> Self {
        let agents: Vec<SocialAgent> = (0..config.population_size)
            .map(|i| {
                let genome = Genome::random(format!("agent-{i}"), "genesis");
                let display_name = genome.agent_id.clone();
                SocialAgent::new(genome, display_name)
            })
            .collect();
        let wallets = agents.iter().map(|_| WalletState::genesis()).collect();

        PopulationManager {
            config,
            agents,
            wallets,
            generation: 0,
            cycle_count: 0,
            last_evolution_at: None,
            last_generation_stats: None,
            sink,
        }
    }

    pub fn cohort_size(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, agent_id: &str) -> Option<&SocialAgent> {
        self.agents.iter().find(|a| a.id() == agent_id)
    }

    pub fn wallet(&self, agent_id: &str) -> Option<&WalletState> {
        self.agents
            .iter()
            .position(|a| a.id() == agent_id)
            .and_then(|index| self.wallets.get(index))
    }

    /// Re-scores the cohort's fitness against freshly gathered performance
    /// data (one entry per agent, cohort order), persists every agent via
    /// the sink, advances the cycle counter, and triggers a generation
    /// advance every `generation_cycles` cycles.
    pub fn run_cycle(&mut self, performance: &[PerformanceData]) {
        debug_assert_eq!(performance.len(), self.agents.len());

        for (agent, data) in self.agents.iter_mut().zip(performance) {
            agent.genome.fitness = weave_evolution::calculate_fitness(data);
        }
        for index in 0..self.agents.len() {
            self.persist_agent(index);
        }

        self.cycle_count += 1;

        if self.cycle_count % self.config.generation_cycles == 0 {
            self.advance_generation();
        }
    }

    fn persist_agent(&mut self, index: usize) {
        let agent = &self.agents[index];
        let identity = IdentityRecord::from(&agent.identity);
        let genome = GenomeRecord::from(&agent.genome);
        let fitness = FitnessRecord::from(agent.genome.fitness);
        let agent_id = agent.id().to_string();
        if let Err(err) = self.sink.save_agent(&identity, &genome, &fitness) {
            tracing::warn!(agent_id = %agent_id, error = %err, "failed to persist agent");
        }
    }

    /// The five-step generation advance: compute and persist this
    /// generation's statistics, evolve the cohort (elitism, tournament
    /// selection, crossover, mutation), replace each slot's genome with
    /// the evolved child while carrying the wallet forward with
    /// multiplicative noise (drawing a fresh genesis wallet if the
    /// predecessor is somehow absent), always redraw sentiment fresh, and
    /// finally bump the generation counter.
    pub fn advance_generation(&mut self) {
        let cohort: Vec<Genome> = self.agents.iter().map(|a| a.genome.clone()).collect();

        let stats = compute_generation_stats(self.generation, &cohort, self.config.reproduction_threshold);
        self.persist_generation_stats(&stats);
        self.last_generation_stats = Some(stats);

        let evolved = evolve(&cohort, &self.config);

        let mut next_agents = Vec::with_capacity(evolved.len());
        let mut next_wallets = Vec::with_capacity(evolved.len());
        for (index, child) in evolved.into_iter().enumerate() {
            let wallet_balance = match self.wallets.get(index) {
                Some(predecessor) => predecessor.wallet_balance * random_provider::range(0.8f32..1.2f32),
                None => random_provider::range(500.0f32..1500.0f32),
            };
            let sentiment = random_provider::range(0.3f32..0.7f32);
            let display_name = child.agent_id.clone();

            next_agents.push(SocialAgent::new(child, display_name));
            next_wallets.push(WalletState { wallet_balance, sentiment });
        }

        self.agents = next_agents;
        self.wallets = next_wallets;
        self.generation += 1;
        self.last_evolution_at = Some(Utc::now());

        let event = EventRecord {
            kind: SmallStr::from("generation_advance"),
            payload: serde_json::json!({ "generation": self.generation }),
            participant_ids: Vec::new(),
        };
        if let Err(err) = self.sink.save_event(&event) {
            tracing::warn!(error = %err, "failed to persist generation-advance event");
        }
    }

    fn persist_generation_stats(&mut self, stats: &GenerationStats) {
        let Ok(payload) = serde_json::to_value(stats) else {
            tracing::warn!(generation = stats.generation, "failed to serialize generation stats");
            return;
        };
        let record = GenerationStatsRecord {
            generation: stats.generation,
            payload,
        };
        if let Err(err) = self.sink.save_generation_stats(&record) {
            tracing::warn!(generation = stats.generation, error = %err, "failed to persist generation stats");
        }
    }

    /// A read-only snapshot for dashboards: current generation, cohort
    /// size, cycle count, time of the last evolution, current fitness
    /// distribution, and the top 5 agents by overall fitness.
    pub fn summary(&self) -> PopulationSummary {
        let fitness: Statistic = self.agents.iter().map(|a| a.genome.fitness.overall).collect();

        let mut top: Vec<&SocialAgent> = self.agents.iter().collect();
        top.sort_by(|a, b| b.genome.fitness.overall.total_cmp(&a.genome.fitness.overall));
        top.truncate(5);

        let top_agents = top
            .into_iter()
            .map(|agent| TopAgent {
                agent_id: SmallStr::from(agent.id()),
                overall_fitness: agent.genome.fitness.overall,
                archetype: agent.archetype(),
            })
            .collect();

        PopulationSummary {
            generation: self.generation,
            cohort_size: self.cohort_size(),
            cycle_count: self.cycle_count,
            last_evolution_at: self.last_evolution_at,
            fitness,
            top_agents,
        }
    }

    pub fn load_cohort(&mut self) -> WeaveResult<()> {
        let records = self.sink.load_cohort()?;
        if records.is_empty() {
            return Ok(());
        }
        let agents: Vec<SocialAgent> = records
            .into_iter()
            .map(|(_, genome)| {
                let display_name = genome.genome.agent_id.clone();
                SocialAgent::new(genome.genome, display_name)
            })
            .collect();
        self.wallets = agents.iter().map(|_| WalletState::genesis()).collect();
        self.agents = agents;
        Ok(())
    }
}

pub struct TopAgent {
    pub agent_id: SmallStr,
    pub overall_fitness: f32,
    pub archetype: PersonalityArchetype,
}

pub struct PopulationSummary {
    pub generation: u64,
    pub cohort_size: usize,
    pub cycle_count: u64,
    pub last_evolution_at: Option<DateTime<Utc>>,
    pub fitness: Statistic,
    pub top_agents: Vec<TopAgent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemorySink;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            population_size: 6,
            generation_cycles: 2,
            tournament_size: 3,
            ..SimulationConfig::default()
        }
        .validated()
        .unwrap()
    }

    #[test]
    fn genesis_creates_the_configured_cohort_size() {
        let manager = PopulationManager::genesis(small_config(), InMemorySink::default());
        assert_eq!(manager.cohort_size(), 6);
        assert_eq!(manager.generation, 0);
        for wallet in &manager.wallets {
            assert!((500.0..=1500.0).contains(&wallet.wallet_balance));
            assert!((0.3..=0.7).contains(&wallet.sentiment));
        }
    }

    #[test]
    fn generation_advances_every_configured_cycle_count() {
        let mut manager = PopulationManager::genesis(small_config(), InMemorySink::default());
        let performance = vec![PerformanceData::default(); 6];

        manager.run_cycle(&performance);
        assert_eq!(manager.generation, 0);
        manager.run_cycle(&performance);
        assert_eq!(manager.generation, 1);
        assert_eq!(manager.cohort_size(), 6);
    }

    #[test]
    fn summary_reports_top_five_by_fitness() {
        let mut manager = PopulationManager::genesis(small_config(), InMemorySink::default());
        for (i, agent) in manager.agents.iter_mut().enumerate() {
            agent.genome.fitness.overall = i as f32 / 10.0;
        }
        let summary = manager.summary();
        assert_eq!(summary.top_agents.len(), 5);
        assert!(summary.top_agents[0].overall_fitness >= summary.top_agents[1].overall_fitness);
    }
}
