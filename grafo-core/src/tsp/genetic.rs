//! Genetic-algorithm tour search.
//!
//! Individuals are open permutations of the vertex indices. Each generation
//! keeps the best individual unchanged and fills the rest of the population
//! with children of tournament winners: partially mapped crossover with
//! probability `crossover_rate`, otherwise a copy of the first parent, then a
//! swap mutation with probability `mutation_rate`. Fitness is the inverse tour
//! length, so the shortest tour wins every comparison.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::{debug, trace};

use crate::error::{AlgorithmError, Result};

/// Parameters of [`super::genetic_tour`].
///
/// # Examples
/// ```
/// use grafo_core::tsp::GeneticConfig;
///
/// let config = GeneticConfig::default().with_generations(50).with_seed(7);
/// assert_eq!(config.population(), 100);
/// assert_eq!(config.generations(), 50);
/// assert_eq!(config.seed(), Some(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneticConfig {
    population: usize,
    generations: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    tournament_size: usize,
    seed: Option<u64>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population: 100,
            generations: 1000,
            mutation_rate: 0.01,
            crossover_rate: 0.8,
            tournament_size: 3,
            seed: None,
        }
    }
}

impl GeneticConfig {
    /// Overrides the population size.
    #[must_use]
    pub const fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Overrides the number of generations.
    #[must_use]
    pub const fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Overrides the per-child mutation probability.
    #[must_use]
    pub const fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Overrides the crossover probability.
    #[must_use]
    pub const fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Overrides the tournament size.
    #[must_use]
    pub const fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Fixes the random seed so runs are reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of individuals per generation.
    #[must_use]
    #[rustfmt::skip]
    pub const fn population(&self) -> usize { self.population }

    /// Number of generations evolved.
    #[must_use]
    #[rustfmt::skip]
    pub const fn generations(&self) -> usize { self.generations }

    /// Probability that a child receives a swap mutation.
    #[must_use]
    #[rustfmt::skip]
    pub const fn mutation_rate(&self) -> f64 { self.mutation_rate }

    /// Probability that a child is bred by crossover.
    #[must_use]
    #[rustfmt::skip]
    pub const fn crossover_rate(&self) -> f64 { self.crossover_rate }

    /// Entrants per selection tournament.
    #[must_use]
    #[rustfmt::skip]
    pub const fn tournament_size(&self) -> usize { self.tournament_size }

    /// Seed in use, or `None` when runs seed from entropy.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> Option<u64> { self.seed }

    pub(super) fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(AlgorithmError::invalid_parameter(
                "population",
                "must be at least 1",
            ));
        }
        if self.tournament_size == 0 {
            return Err(AlgorithmError::invalid_parameter(
                "tournament_size",
                "must be at least 1",
            ));
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(AlgorithmError::invalid_parameter(name, "must lie within [0, 1]"));
            }
        }
        Ok(())
    }

    fn rng(&self) -> SmallRng {
        self.seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64)
    }
}

fn tour_cost(weights: &[Vec<f64>], order: &[usize]) -> f64 {
    order
        .iter()
        .zip(order.iter().cycle().skip(1))
        .map(|(&a, &b)| weights[a][b])
        .sum()
}

struct Population {
    individuals: Vec<Vec<usize>>,
    costs: Vec<f64>,
}

impl Population {
    fn random(weights: &[Vec<f64>], size: usize, rng: &mut SmallRng) -> Self {
        let individuals: Vec<Vec<usize>> = (0..size)
            .map(|_| {
                let mut order: Vec<usize> = (0..weights.len()).collect();
                order.shuffle(rng);
                order
            })
            .collect();
        Self::scored(weights, individuals)
    }

    fn scored(weights: &[Vec<f64>], individuals: Vec<Vec<usize>>) -> Self {
        let costs = individuals
            .iter()
            .map(|order| tour_cost(weights, order))
            .collect();
        Self { individuals, costs }
    }

    /// Index of the shortest tour; ties go to the earlier individual.
    fn best(&self) -> usize {
        self.costs
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1).then_with(|| a.0.cmp(&b.0)))
            .map_or(0, |(index, _)| index)
    }

    fn tournament(&self, size: usize, rng: &mut SmallRng) -> &[usize] {
        let entrants = size.min(self.individuals.len());
        let winner = rand::seq::index::sample(rng, self.individuals.len(), entrants)
            .into_iter()
            .min_by(|&a, &b| self.costs[a].total_cmp(&self.costs[b]).then_with(|| a.cmp(&b)))
            .unwrap_or(0);
        &self.individuals[winner]
    }
}

/// Partially mapped crossover: the child keeps a random slice of `first` in
/// place and fills the remaining positions from `second`, following the slice
/// mapping whenever a value of `second` is already taken.
fn pmx(first: &[usize], second: &[usize], rng: &mut SmallRng) -> Vec<usize> {
    const UNSET: usize = usize::MAX;
    let n = first.len();
    let start = rng.gen_range(0..n);
    let end = rng.gen_range(start..n);

    let mut child = vec![UNSET; n];
    let mut in_slice = vec![false; n];
    for position in start..=end {
        child[position] = first[position];
        in_slice[first[position]] = true;
    }
    let mut position_in_second = vec![0; n];
    for (position, &value) in second.iter().enumerate() {
        position_in_second[value] = position;
    }
    for position in start..=end {
        let value = second[position];
        if in_slice[value] {
            continue;
        }
        let mut slot = position;
        while (start..=end).contains(&slot) {
            slot = position_in_second[first[slot]];
        }
        child[slot] = value;
    }
    for (slot, &value) in child.iter_mut().zip(second) {
        if *slot == UNSET {
            *slot = value;
        }
    }
    child
}

fn swap_mutation(order: &mut [usize], rng: &mut SmallRng) {
    let a = rng.gen_range(0..order.len());
    let b = rng.gen_range(0..order.len());
    order.swap(a, b);
}

/// Best open tour found and its cost. Needs at least two vertices.
pub(super) fn evolve(weights: &[Vec<f64>], config: &GeneticConfig) -> (Vec<usize>, f64) {
    let mut rng = config.rng();
    let mut population = Population::random(weights, config.population, &mut rng);
    for generation in 0..config.generations {
        let elite = population.best();
        let mut next = Vec::with_capacity(config.population);
        next.push(population.individuals[elite].clone());
        while next.len() < config.population {
            let first = population.tournament(config.tournament_size, &mut rng);
            let second = population.tournament(config.tournament_size, &mut rng);
            let mut child = if rng.gen_bool(config.crossover_rate) {
                pmx(first, second, &mut rng)
            } else {
                first.to_vec()
            };
            if rng.gen_bool(config.mutation_rate) {
                swap_mutation(&mut child, &mut rng);
            }
            next.push(child);
        }
        population = Population::scored(weights, next);
        trace!(generation, best = population.costs[population.best()], "generation scored");
    }
    let best = population.best();
    let cost = population.costs[best];
    debug!(cost, generations = config.generations, "genetic search finished");
    (population.individuals.swap_remove(best), cost)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::{GeneticConfig, pmx};
    use crate::{error::AlgorithmErrorCode, test_utils::suite_proptest_config};

    #[rstest]
    #[case::empty_population(GeneticConfig::default().with_population(0))]
    #[case::no_tournament(GeneticConfig::default().with_tournament_size(0))]
    #[case::mutation_above_one(GeneticConfig::default().with_mutation_rate(1.5))]
    #[case::negative_crossover(GeneticConfig::default().with_crossover_rate(-0.1))]
    fn rejects_invalid_settings(#[case] config: GeneticConfig) {
        let err = config.validate().expect_err("invalid config");
        assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
    }

    proptest! {
        #![proptest_config(suite_proptest_config(128))]

        #[test]
        fn pmx_children_are_permutations(
            (first, second) in (2_usize..12).prop_flat_map(|n| {
                let base: Vec<usize> = (0..n).collect();
                (Just(base.clone()).prop_shuffle(), Just(base).prop_shuffle())
            }),
            seed in any::<u64>(),
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let child = pmx(&first, &second, &mut rng);
            let values: BTreeSet<usize> = child.iter().copied().collect();
            prop_assert_eq!(child.len(), first.len());
            prop_assert_eq!(values.len(), first.len());
        }
    }
}
