//! Built-in pool of realistic desktop and mobile browser user agents.

use rand::Rng;

pub const USER_AGENT_POOL: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// Picks one pool entry uniformly at random.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENT_POOL[rng.random_range(0..USER_AGENT_POOL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_is_deterministic_for_a_seed() {
        let first = pick(&mut StdRng::seed_from_u64(11));
        let second = pick(&mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
        assert!(USER_AGENT_POOL.contains(&first));
    }

    #[test]
    fn pick_covers_the_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick(&mut rng));
        }
        assert_eq!(seen.len(), USER_AGENT_POOL.len());
    }
}
