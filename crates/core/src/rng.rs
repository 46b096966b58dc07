use rand::{seq::SliceRandom, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded generator carried inside snapshots. Cloning it forks the stream, so advancing
/// the copy held by a new snapshot leaves the previous snapshot untouched.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Generator for the `shop_index`-th shop of a run. Same inputs, same stream.
    pub fn for_shop(run_seed: u64, shop_index: u32) -> Self {
        Self::from_seed(shop_seed(run_seed, shop_index))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[min, max)`; returns `min` for an empty range.
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_int(0, items.len() as u32) as usize;
        items.get(idx)
    }

    /// Fisher-Yates, unbiased.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Walks the list subtracting weights from a roll in `[0, total)`. Zero and negative
    /// weights never win.
    pub fn weighted_choice<T: Clone>(&mut self, items: &[(T, f64)]) -> Option<T> {
        let live: Vec<&(T, f64)> = items.iter().filter(|(_, weight)| *weight > 0.0).collect();
        let total: f64 = live.iter().map(|(_, weight)| *weight).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.next_float() * total;
        for (item, weight) in &live {
            if roll < *weight {
                return Some(item.clone());
            }
            roll -= weight;
        }
        live.last().map(|(item, _)| item.clone())
    }
}

impl PartialEq for RngState {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.rng.get_seed() == other.rng.get_seed()
            && self.rng.get_word_pos() == other.rng.get_word_pos()
    }
}

pub fn shop_seed(run_seed: u64, shop_index: u32) -> u64 {
    run_seed.wrapping_add(u64::from(shop_index).wrapping_mul(1000))
}
