use serde::{Deserialize, Serialize};
use weave_error::{WeaveError, WeaveResult};
use weave_utils::SmallStr;

use crate::random_provider;

/// Generates the fixed-key numeric gene group for one behavioural domain:
/// a plain struct of `f32` fields (each clamped to `[0,1]` on construction
/// and mutation) plus the trait-name table the evolution engine and
/// reporting code walk by name.
macro_rules! domain_genes {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: f32),+
        }

        impl $name {
            pub const TRAITS: &'static [&'static str] = &[$(stringify!($field)),+];
            pub const LEN: usize = Self::TRAITS.len();

            pub fn random() -> Self {
                Self { $($field: random_provider::random::<f32>()),+ }
            }

            pub fn get(&self, trait_name: &str) -> Option<f32> {
                match trait_name {
                    $(stringify!($field) => Some(self.$field),)+
                    _ => None,
                }
            }

            pub fn set(&mut self, trait_name: &str, value: f32) -> bool {
                match trait_name {
                    $(stringify!($field) => { self.$field = value.clamp(0.0, 1.0); true },)+
                    _ => false,
                }
            }

            pub fn values(&self) -> [f32; Self::LEN] {
                [$(self.$field),+]
            }

            pub fn from_values(values: [f32; Self::LEN]) -> Self {
                let mut iter = values.into_iter();
                Self { $($field: iter.next().unwrap().clamp(0.0, 1.0)),+ }
            }

            pub fn validate(&self) -> WeaveResult<()> {
                for (name, value) in Self::TRAITS.iter().zip(self.values()) {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(WeaveError::InvalidGenome {
                            message: format!("{}.{} = {} out of [0,1]", stringify!($name), name, value).into(),
                        });
                    }
                }
                Ok(())
            }
        }
    };
}

domain_genes!(LimboGenes {
    risk_tolerance,
    price_sensitivity,
    quality_preference,
    novelty_seeking,
    brand_loyalty,
});

domain_genes!(OdysseyNumeric {
    creativity_drive,
    experimentation,
    customization_desire,
    innovation_appetite,
});

domain_genes!(RitualGenes {
    community_bonding,
    influence_susceptibility,
    loyalty_factor,
    social_conformity,
    leadership_tendency,
});

domain_genes!(EngineGenes {
    analytical_thinking,
    pattern_recognition,
    strategic_planning,
    data_interpretation,
    decision_confidence,
});

domain_genes!(LogsGenes {
    patience_level,
    service_expectations,
    complaint_tendency,
    efficiency_priority,
    reliability_value,
});

/// The single categorical trait in the gene schema, defined only on `odyssey`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AestheticBias {
    Minimalist,
    Maximalist,
    Vintage,
    Futuristic,
    Natural,
    Geometric,
    Organic,
    Industrial,
}

impl AestheticBias {
    pub const ALL: [AestheticBias; 8] = [
        AestheticBias::Minimalist,
        AestheticBias::Maximalist,
        AestheticBias::Vintage,
        AestheticBias::Futuristic,
        AestheticBias::Natural,
        AestheticBias::Geometric,
        AestheticBias::Organic,
        AestheticBias::Industrial,
    ];

    pub fn random() -> Self {
        *random_provider::choose(&Self::ALL)
    }

    /// A uniformly chosen variant guaranteed to differ from `self`, used by
    /// categorical mutation (which must resample to a *different* value).
    pub fn random_other_than(self) -> Self {
        loop {
            let candidate = Self::random();
            if candidate != self {
                return candidate;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OdysseyGenes {
    pub numeric: OdysseyNumeric,
    pub aesthetic_bias: AestheticBias,
}

impl OdysseyGenes {
    pub fn random() -> Self {
        Self {
            numeric: OdysseyNumeric::random(),
            aesthetic_bias: AestheticBias::random(),
        }
    }

    pub fn validate(&self) -> WeaveResult<()> {
        self.numeric.validate()
    }
}

impl std::ops::Deref for OdysseyGenes {
    type Target = OdysseyNumeric;
    fn deref(&self) -> &Self::Target {
        &self.numeric
    }
}

impl std::ops::DerefMut for OdysseyGenes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.numeric
    }
}

/// The five behavioural domains, fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Limbo,
    Odyssey,
    Ritual,
    Engine,
    Logs,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Limbo,
        Domain::Odyssey,
        Domain::Ritual,
        Domain::Engine,
        Domain::Logs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Domain::Limbo => "limbo",
            Domain::Odyssey => "odyssey",
            Domain::Ritual => "ritual",
            Domain::Engine => "engine",
            Domain::Logs => "logs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainGenes {
    pub limbo: LimboGenes,
    pub odyssey: OdysseyGenes,
    pub ritual: RitualGenes,
    pub engine: EngineGenes,
    pub logs: LogsGenes,
}

impl DomainGenes {
    pub fn random() -> Self {
        Self {
            limbo: LimboGenes::random(),
            odyssey: OdysseyGenes::random(),
            ritual: RitualGenes::random(),
            engine: EngineGenes::random(),
            logs: LogsGenes::random(),
        }
    }

    pub fn validate(&self) -> WeaveResult<()> {
        self.limbo.validate()?;
        self.odyssey.validate()?;
        self.ritual.validate()?;
        self.engine.validate()?;
        self.logs.validate()?;
        Ok(())
    }

    /// Every `(domain, trait, value)` triple in the fixed schema, in
    /// declared domain and trait order.
    pub fn numeric_traits(&self) -> Vec<(Domain, &'static str, f32)> {
        let mut out = Vec::with_capacity(24);
        for (name, value) in LimboGenes::TRAITS.iter().zip(self.limbo.values()) {
            out.push((Domain::Limbo, *name, value));
        }
        for (name, value) in OdysseyNumeric::TRAITS.iter().zip(self.odyssey.values()) {
            out.push((Domain::Odyssey, *name, value));
        }
        for (name, value) in RitualGenes::TRAITS.iter().zip(self.ritual.values()) {
            out.push((Domain::Ritual, *name, value));
        }
        for (name, value) in EngineGenes::TRAITS.iter().zip(self.engine.values()) {
            out.push((Domain::Engine, *name, value));
        }
        for (name, value) in LogsGenes::TRAITS.iter().zip(self.logs.values()) {
            out.push((Domain::Logs, *name, value));
        }
        out
    }

    pub fn get(&self, domain: Domain, trait_name: &str) -> Option<f32> {
        match domain {
            Domain::Limbo => self.limbo.get(trait_name),
            Domain::Odyssey => self.odyssey.numeric.get(trait_name),
            Domain::Ritual => self.ritual.get(trait_name),
            Domain::Engine => self.engine.get(trait_name),
            Domain::Logs => self.logs.get(trait_name),
        }
    }

    pub fn set(&mut self, domain: Domain, trait_name: &str, value: f32) -> bool {
        match domain {
            Domain::Limbo => self.limbo.set(trait_name, value),
            Domain::Odyssey => self.odyssey.numeric.set(trait_name, value),
            Domain::Ritual => self.ritual.set(trait_name, value),
            Domain::Engine => self.engine.set(trait_name, value),
            Domain::Logs => self.logs.set(trait_name, value),
        }
    }
}

/// Per-domain and aggregate fitness, each clamped to `[0,1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessVector {
    pub limbo: f32,
    pub odyssey: f32,
    pub ritual: f32,
    pub engine: f32,
    pub logs: f32,
    pub overall: f32,
}

impl FitnessVector {
    pub const NEUTRAL: FitnessVector = FitnessVector {
        limbo: 0.5,
        odyssey: 0.5,
        ritual: 0.5,
        engine: 0.5,
        logs: 0.5,
        overall: 0.5,
    };

    /// The literal advisory gate of the reproduction policy: `overall`
    /// never consulted by `evolve` itself, only by downstream callers.
    pub fn can_reproduce(&self, reproduction_threshold: f32) -> bool {
        self.overall >= reproduction_threshold
    }

    pub fn mean_with(&self, other: &FitnessVector) -> FitnessVector {
        FitnessVector {
            limbo: (self.limbo + other.limbo) / 2.0,
            odyssey: (self.odyssey + other.odyssey) / 2.0,
            ritual: (self.ritual + other.ritual) / 2.0,
            engine: (self.engine + other.engine) / 2.0,
            logs: (self.logs + other.logs) / 2.0,
            overall: (self.overall + other.overall) / 2.0,
        }
    }
}

impl Default for FitnessVector {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    Numeric,
    Categorical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub domain: Domain,
    pub trait_name: SmallStr,
    pub old_value: SmallStr,
    pub new_value: SmallStr,
    pub kind: MutationKind,
    pub magnitude: Option<f32>,
}

/// An immutable per-individual genetic record. Mutation never happens
/// in place; the evolution engine always produces a new `Genome`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub agent_id: SmallStr,
    pub generation: u64,
    pub parent_ids: Vec<SmallStr>,
    pub birth_token: SmallStr,
    pub domains: DomainGenes,
    pub fitness: FitnessVector,
    pub mutation_log: Vec<MutationRecord>,
}

impl Genome {
    /// `random_genome(agent_id)`: a generation-0 individual with every
    /// numeric trait drawn uniformly from `[0,1]` and `aesthetic_bias`
    /// drawn uniformly from its 8 variants.
    pub fn random(agent_id: impl Into<SmallStr>, birth_token: impl Into<SmallStr>) -> Self {
        Genome {
            agent_id: agent_id.into(),
            generation: 0,
            parent_ids: Vec::new(),
            birth_token: birth_token.into(),
            domains: DomainGenes::random(),
            fitness: FitnessVector::NEUTRAL,
            mutation_log: Vec::new(),
        }
    }

    pub fn validate(&self) -> WeaveResult<()> {
        if self.parent_ids.len() != 0 && self.parent_ids.len() != 2 {
            return Err(WeaveError::InvalidGenome {
                message: format!(
                    "parent_ids must have length 0 or 2, got {}",
                    self.parent_ids.len()
                )
                .into(),
            });
        }
        self.domains.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_genome_is_valid_and_neutral() {
        let genome = Genome::random("agent-1", "genesis");
        assert!(genome.validate().is_ok());
        assert_eq!(genome.fitness.overall, 0.5);
        assert_eq!(genome.generation, 0);
        assert!(genome.parent_ids.is_empty());
    }

    #[test]
    fn numeric_traits_covers_all_24() {
        let genome = Genome::random("agent-1", "genesis");
        assert_eq!(genome.domains.numeric_traits().len(), 24);
    }

    #[test]
    fn aesthetic_bias_other_than_always_differs() {
        for variant in AestheticBias::ALL {
            for _ in 0..20 {
                assert_ne!(variant.random_other_than(), variant);
            }
        }
    }

    #[test]
    fn rejects_invalid_parent_count() {
        let mut genome = Genome::random("agent-1", "genesis");
        genome.parent_ids = vec!["only-one".into()];
        assert!(genome.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_trait() {
        let mut genome = Genome::random("agent-1", "genesis");
        genome.domains.limbo.risk_tolerance = 1.5;
        assert!(genome.validate().is_err());
    }
}
