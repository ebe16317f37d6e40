//! Ranking, elitism and mating-pool construction.
//!
//! Candidates are ordered by ascending penalty with a stable sort, so ties
//! keep their population order and a fixed seed always yields the same
//! ranking.

use rand::Rng;

use super::types::Candidate;

/// Population indices, best first.
pub fn rank_by_penalty(population: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by_key(|&i| population[i].penalty());
    order
}

/// Deep copies of the `count` best candidates.
///
/// Returns fewer when the population is smaller than `count`.
pub fn elites(population: &[Candidate], count: usize) -> Vec<Candidate> {
    rank_by_penalty(population)
        .into_iter()
        .take(count)
        .map(|i| population[i].clone())
        .collect()
}

/// Builds the pool parents are drawn from.
///
/// The best `floor(pool_size * elite_ratio)` candidates go in verbatim; the
/// rest of the pool is sampled uniformly, with replacement, from the whole
/// population.
///
/// # Panics
/// Panics if `population` is empty and `pool_size` is non-zero.
pub fn build_mating_pool<R: Rng>(
    population: &[Candidate],
    pool_size: usize,
    elite_ratio: f64,
    rng: &mut R,
) -> Vec<Candidate> {
    assert!(
        !population.is_empty() || pool_size == 0,
        "cannot build a mating pool from an empty population"
    );

    let elite_count = (pool_size as f64 * elite_ratio) as usize;
    let mut pool = elites(population, elite_count.min(pool_size));
    pool.reserve(pool_size - pool.len());
    while pool.len() < pool_size {
        let idx = rng.random_range(0..population.len());
        pool.push(population[idx].clone());
    }
    pool
}

/// Draws one parent uniformly from the pool.
///
/// # Panics
/// Panics if `pool` is empty.
pub fn pick_parent<'a, R: Rng>(pool: &'a [Candidate], rng: &mut R) -> &'a Candidate {
    assert!(!pool.is_empty(), "cannot select from empty mating pool");
    &pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn make_population(penalties: &[u32]) -> Vec<Candidate> {
        penalties
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut c = Candidate::new(vec![i as u8]);
                c.set_penalty(p);
                c
            })
            .collect()
    }

    #[test]
    fn test_rank_is_ascending_and_stable() {
        let pop = make_population(&[5, 1, 3, 1, 0]);
        assert_eq!(rank_by_penalty(&pop), vec![4, 1, 3, 2, 0]);
    }

    #[test]
    fn test_elites_are_best_copies() {
        let pop = make_population(&[5, 1, 3, 1, 0]);
        let top = elites(&pop, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].penalty(), 0);
        assert_eq!(top[1].cells(), &[1]);
    }

    #[test]
    fn test_elites_capped_by_population() {
        let pop = make_population(&[2, 1]);
        assert_eq!(elites(&pop, 10).len(), 2);
    }

    #[test]
    fn test_pool_head_is_elite() {
        let pop = make_population(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        let mut rng = create_rng(42);
        let pool = build_mating_pool(&pop, 10, 0.3, &mut rng);
        assert_eq!(pool.len(), 10);
        let head: Vec<u32> = pool[..3].iter().map(Candidate::penalty).collect();
        assert_eq!(head, vec![0, 1, 2]);
    }

    #[test]
    fn test_pool_fill_samples_whole_population() {
        let pop = make_population(&[3, 2, 1, 0]);
        let mut rng = create_rng(42);
        let mut seen = [0u32; 4];
        for _ in 0..200 {
            let pool = build_mating_pool(&pop, 4, 0.0, &mut rng);
            for c in &pool {
                seen[c.cells()[0] as usize] += 1;
            }
        }
        for &count in &seen {
            assert!(count > 100, "expected uniform sampling, got {seen:?}");
        }
    }

    #[test]
    fn test_pool_larger_than_population() {
        let pop = make_population(&[4]);
        let mut rng = create_rng(42);
        let pool = build_mating_pool(&pop, 2, 1.0, &mut rng);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|c| c.penalty() == 4));
    }

    #[test]
    fn test_pick_parent_uniform() {
        let pool = make_population(&[0, 0, 0, 0]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[pick_parent(&pool, &mut rng).cells()[0] as usize] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty mating pool")]
    fn test_empty_pool_panics() {
        let pool: Vec<Candidate> = vec![];
        let mut rng = create_rng(42);
        pick_parent(&pool, &mut rng);
    }
}
