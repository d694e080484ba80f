use weave_core::random_provider;
use weave_core::{Domain, DomainGenes, Genome};
use weave_utils::SmallStr;

/// Produces one child from two parents. Per numeric trait, with
/// probability `crossover_rate` the child's value is a random convex
/// blend of both parents' values; otherwise it copies one parent's value
/// chosen uniformly. The categorical `aesthetic_bias` is always a
/// uniform pick of one parent's value, independent of `crossover_rate`.
/// The child's fitness is the elementwise mean of its parents', its
/// generation is `max(parent generations) + 1`, and its mutation log
/// starts empty.
pub fn crossover(
    parent_one: &Genome,
    parent_two: &Genome,
    child_id: impl Into<SmallStr>,
    crossover_rate: f32,
) -> Genome {
    let domains = cross_domains(&parent_one.domains, &parent_two.domains, crossover_rate);
    let fitness = parent_one.fitness.mean_with(&parent_two.fitness);
    let generation = parent_one.generation.max(parent_two.generation) + 1;

    Genome {
        agent_id: child_id.into(),
        generation,
        parent_ids: vec![parent_one.agent_id.clone(), parent_two.agent_id.clone()],
        birth_token: parent_one.birth_token.clone(),
        domains,
        fitness,
        mutation_log: Vec::new(),
    }
}

fn cross_domains(a: &DomainGenes, b: &DomainGenes, crossover_rate: f32) -> DomainGenes {
    let mut child = a.clone();

    for domain in Domain::ALL {
        for &trait_name in numeric_trait_names(domain) {
            let value_a = a.get(domain, trait_name).expect("trait exists");
            let value_b = b.get(domain, trait_name).expect("trait exists");
            let value = if random_provider::random::<f32>() < crossover_rate {
                let weight = random_provider::random::<f32>();
                weight * value_a + (1.0 - weight) * value_b
            } else if random_provider::bool(0.5) {
                value_a
            } else {
                value_b
            };
            child.set(domain, trait_name, value);
        }
    }

    child.odyssey.aesthetic_bias = if random_provider::bool(0.5) {
        a.odyssey.aesthetic_bias
    } else {
        b.odyssey.aesthetic_bias
    };

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

    fn genome_with_overall(id: &str, overall: f32) -> Genome {
        let mut genome = Genome::random(id, "genesis");
        genome.fitness.overall = overall;
        genome
    }

    #[test]
    fn child_generation_is_one_past_the_elder_parent() {
        let mut p1 = Genome::random("p1", "genesis");
        let mut p2 = Genome::random("p2", "genesis");
        p1.generation = 3;
        p2.generation = 7;
        let child = crossover(&p1, &p2, "child", 0.7);
        assert_eq!(child.generation, 8);
        assert_eq!(child.parent_ids, vec![SmallStr::from("p1"), SmallStr::from("p2")]);
        assert!(child.mutation_log.is_empty());
    }

    #[test]
    fn child_fitness_is_elementwise_mean() {
        let p1 = genome_with_overall("p1", 0.9);
        let p2 = genome_with_overall("p2", 0.3);
        let child = crossover(&p1, &p2, "child", 0.7);
        assert!((child.fitness.overall - 0.6).abs() < 1e-6);
    }

    #[test]
    fn crossover_rate_zero_always_copies_a_parent_value() {
        let p1 = Genome::random("p1", "genesis");
        let p2 = Genome::random("p2", "genesis");
        for _ in 0..50 {
            let child = crossover(&p1, &p2, "child", 0.0);
            for (domain, name, value) in child.domains.numeric_traits() {
                let from_p1 = p1.domains.get(domain, name).unwrap();
                let from_p2 = p2.domains.get(domain, name).unwrap();
                assert!(value == from_p1 || value == from_p2);
            }
        }
    }

    #[test]
    fn child_traits_stay_in_bounds() {
        let p1 = Genome::random("p1", "genesis");
        let p2 = Genome::random("p2", "genesis");
        let child = crossover(&p1, &p2, "child", 0.7);
        assert!(child.validate().is_ok());
    }
}
