use serde::{Deserialize, Serialize};
use weave_core::{FitnessVector, Genome, Identity};
use weave_error::WeaveResult;
use weave_utils::SmallStr;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub agent_id: SmallStr,
    pub display_name: SmallStr,
    pub archetype: SmallStr,
}

impl From<&Identity> for IdentityRecord {
    fn from(identity: &Identity) -> Self {
        IdentityRecord {
            agent_id: identity.agent_id.clone(),
            display_name: identity.display_name.clone(),
            archetype: SmallStr::from(identity.personality_archetype.name()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub genome: Genome,
}

impl From<&Genome> for GenomeRecord {
    fn from(genome: &Genome) -> Self {
        GenomeRecord { genome: genome.clone() }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub fitness: FitnessVector,
}

impl From<FitnessVector> for FitnessRecord {
    fn from(fitness: FitnessVector) -> Self {
        FitnessRecord { fitness }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationStatsRecord {
    pub generation: u64,
    pub payload: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: SmallStr,
    pub payload: serde_json::Value,
    pub participant_ids: Vec<SmallStr>,
}

/// The four operations the Population Manager requires of an opaque,
/// externally supplied persistence sink. Each call is expected to be
/// atomic; the core never assumes transactions across calls, and a
/// failing call is caught and logged rather than treated as fatal.
pub trait PersistenceSink {
    fn save_agent(
        &mut self,
        identity: &IdentityRecord,
        genome: &GenomeRecord,
        fitness: &FitnessRecord,
    ) -> WeaveResult<()>;

    fn save_generation_stats(&mut self, record: &GenerationStatsRecord) -> WeaveResult<()>;

    fn save_event(&mut self, record: &EventRecord) -> WeaveResult<()>;

    fn load_cohort(&mut self) -> WeaveResult<Vec<(IdentityRecord, GenomeRecord)>>;
}

/// An in-memory sink that never fails, useful for tests and for running
/// the simulation without a real backing store.
#[derive(Default)]
pub struct InMemorySink {
    pub agents: Vec<(IdentityRecord, GenomeRecord, FitnessRecord)>,
    pub generation_stats: Vec<GenerationStatsRecord>,
    pub events: Vec<EventRecord>,
}

impl PersistenceSink for InMemorySink {
    fn save_agent(
        &mut self,
        identity: &IdentityRecord,
        genome: &GenomeRecord,
        fitness: &FitnessRecord,
    ) -> WeaveResult<()> {
        self.agents.push((identity.clone(), genome.clone(), *fitness));
        Ok(())
    }

    fn save_generation_stats(&mut self, record: &GenerationStatsRecord) -> WeaveResult<()> {
        self.generation_stats.push(record.clone());
        Ok(())
    }

    fn save_event(&mut self, record: &EventRecord) -> WeaveResult<()> {
        self.events.push(record.clone());
        Ok(())
    }

    fn load_cohort(&mut self) -> WeaveResult<Vec<(IdentityRecord, GenomeRecord)>> {
        Ok(self
            .agents
            .iter()
            .map(|(identity, genome, _)| (identity.clone(), genome.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Genome;

    #[test]
    fn in_memory_sink_round_trips_a_cohort() {
        let mut sink = InMemorySink::default();
        let genome = Genome::random("a", "genesis");
        let identity = Identity::from_genome(&genome, "Agent A");

        sink.save_agent(
            &IdentityRecord::from(&identity),
            &GenomeRecord::from(&genome),
            &FitnessRecord::from(genome.fitness),
        )
        .unwrap();

        let loaded = sink.load_cohort().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1.genome.agent_id, genome.agent_id);
    }
}
