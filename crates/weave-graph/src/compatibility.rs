use weave_core::Genome;

/// `compatibility = mean(1 − |g1 − g2|)` over every numeric trait in the
/// fixed schema (all 24 traits exist on both genomes, so "union" is
/// simply the whole set). Symmetric in its two arguments, bounded to
/// `[0,1]`.
pub fn genetic_compatibility(a: &Genome, b: &Genome) -> f32 {
    let a_traits = a.domains.numeric_traits();
    let b_traits = b.domains.numeric_traits();

    let total: f32 = a_traits
        .iter()
        .zip(b_traits.iter())
        .map(|((_, _, va), (_, _, vb))| 1.0 - (va - vb).abs())
        .sum();

    (total / a_traits.len() as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_genomes_are_fully_compatible() {
        let genome = Genome::random("agent-1", "genesis");
        assert!((genetic_compatibility(&genome, &genome) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn compatibility_is_symmetric() {
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        assert!((genetic_compatibility(&a, &b) - genetic_compatibility(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn compatibility_is_bounded() {
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        let value = genetic_compatibility(&a, &b);
        assert!((0.0..=1.0).contains(&value));
    }
}
