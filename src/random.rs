use rand::Rng;

/// In-place Fisher–Yates shuffle: walk from the last index down to 1,
/// swapping each element with a uniformly chosen index in `[0, i]`.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// One uniformly chosen element, or `None` on empty input.
pub fn pick_uniform<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut items: Vec<usize> = (0..20).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![7];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn test_shuffle_uniformity_chi_square() {
        // Position/value distribution over many shuffles of a 5-element
        // sequence. The chi-square statistic over all 25 cells has ~20
        // degrees of freedom; 60 is far beyond any plausible fluctuation
        // for a uniform shuffle and far below what a biased one produces.
        const N: usize = 5;
        const TRIALS: usize = 5000;
        let mut rng = SmallRng::seed_from_u64(0xD1CE);
        let mut counts = [[0usize; N]; N];

        for _ in 0..TRIALS {
            let mut items: Vec<usize> = (0..N).collect();
            shuffle(&mut items, &mut rng);
            for (pos, &val) in items.iter().enumerate() {
                counts[pos][val] += 1;
            }
        }

        let expected = TRIALS as f64 / N as f64;
        let chi2: f64 = counts
            .iter()
            .flatten()
            .map(|&obs| {
                let d = obs as f64 - expected;
                d * d / expected
            })
            .sum();
        assert!(chi2 < 60.0, "chi-square too high: {chi2}");
    }

    #[test]
    fn test_pick_uniform_empty_is_none() {
        let mut rng = SmallRng::seed_from_u64(3);
        let items: Vec<u8> = Vec::new();
        assert!(pick_uniform(&items, &mut rng).is_none());
    }

    #[test]
    fn test_pick_uniform_covers_all_elements() {
        let mut rng = SmallRng::seed_from_u64(9);
        let items = vec!['a', 'b', 'c', 'd'];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pick_uniform(&items, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), items.len());
    }
}
