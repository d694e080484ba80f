use weave_core::random_provider;
use weave_core::{Domain, Genome, MutationKind, MutationRecord};
use weave_utils::SmallStr;

const MUTATION_STD_DEV: f64 = 0.1;

/// Produces a mutated copy of `genome`. Per numeric trait, with
/// probability `mutation_rate` the value is perturbed by
/// `N(0, 0.1)` and clamped to `[0,1]`; the single categorical trait
/// (`aesthetic_bias`) is instead resampled to a *different* variant with
/// probability `mutation_rate / 2`. Identity fields (`agent_id`,
/// `generation`, `parent_ids`, `birth_token`, `fitness`) are preserved
/// unchanged; every applied change is appended to the mutation log.
pub fn mutate(genome: &Genome, mutation_rate: f32) -> Genome {
    let mut child = genome.clone();

    for domain in Domain::ALL {
        for &trait_name in numeric_trait_names(domain) {
            if random_provider::random::<f32>() >= mutation_rate {
                continue;
            }

            let old_value = child.domains.get(domain, trait_name).expect("trait exists");
            let delta = random_provider::gaussian(0.0, MUTATION_STD_DEV) as f32;
            let new_value = (old_value + delta).clamp(0.0, 1.0);
            child.domains.set(domain, trait_name, new_value);

            child.mutation_log.push(MutationRecord {
                domain,
                trait_name: SmallStr::from(trait_name),
                old_value: SmallStr::from(format!("{old_value}")),
                new_value: SmallStr::from(format!("{new_value}")),
                kind: MutationKind::Numeric,
                magnitude: Some(delta),
            });
        }
    }

    if random_provider::random::<f32>() < mutation_rate / 2.0 {
        let old_bias = child.domains.odyssey.aesthetic_bias;
        let new_bias = old_bias.random_other_than();
        child.domains.odyssey.aesthetic_bias = new_bias;

        child.mutation_log.push(MutationRecord {
            domain: Domain::Odyssey,
            trait_name: SmallStr::from("aesthetic_bias"),
            old_value: SmallStr::from(format!("{old_bias:?}")),
            new_value: SmallStr::from(format!("{new_bias:?}")),
            kind: MutationKind::Categorical,
            magnitude: None,
        });
    }

    child
}

fn numeric_trait_names(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Limbo => weave_core::LimboGenes::TRAITS,
        Domain::Odyssey => weave_core::OdysseyNumeric::TRAITS,
        Domain::Ritual => weave_core::RitualGenes::TRAITS,
        Domain::Engine => weave_core::EngineGenes::TRAITS,
        Domain::Logs => weave_core::LogsGenes::TRAITS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_is_identity() {
        let genome = Genome::random("agent-1", "genesis");
        let mutated = mutate(&genome, 0.0);
        assert_eq!(mutated.domains, genome.domains);
        assert!(mutated.mutation_log.is_empty());
    }

    #[test]
    fn preserves_identity_fields() {
        let genome = Genome::random("agent-1", "genesis");
        let mutated = mutate(&genome, 1.0);
        assert_eq!(mutated.agent_id, genome.agent_id);
        assert_eq!(mutated.generation, genome.generation);
        assert_eq!(mutated.parent_ids, genome.parent_ids);
        assert_eq!(mutated.birth_token, genome.birth_token);
        assert_eq!(mutated.fitness, genome.fitness);
    }

    #[test]
    fn full_rate_stays_in_bounds_and_logs_changes() {
        let genome = Genome::random("agent-1", "genesis");
        let mutated = mutate(&genome, 1.0);
        assert!(mutated.validate().is_ok());
        assert!(!mutated.mutation_log.is_empty());
    }
}
