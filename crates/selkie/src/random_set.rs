//! Candidate pool with O(1) random pick-and-delete.
//!
//! An index-swap array plus a position lookup table: removal swaps the victim
//! with the last slot, so draws and deletions are constant time. Items are
//! dense indices assigned by the caller (one per node of the current level).

use crate::model::GalaxyChoice;
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug)]
pub struct RandomNodeSet {
    items: Vec<usize>,
    // item -> index in `items`, or NONE when removed
    pos: Vec<usize>,
}

const NONE: usize = usize::MAX;

impl RandomNodeSet {
    pub fn full(n: usize) -> Self {
        Self {
            items: (0..n).collect(),
            pos: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: usize) -> bool {
        self.pos[item] != NONE
    }

    pub fn remove(&mut self, item: usize) -> bool {
        let at = self.pos[item];
        if at == NONE {
            return false;
        }
        let last = *self.items.last().unwrap();
        self.items.swap_remove(at);
        if last != item {
            self.pos[last] = at;
        }
        self.pos[item] = NONE;
        true
    }

    /// Draw and remove one item according to the galaxy-choice policy. The
    /// mass-biased policies take the extreme of `tries` uniform samples.
    pub fn draw(
        &mut self,
        rng: &mut StdRng,
        policy: GalaxyChoice,
        tries: usize,
        mass: &[u32],
    ) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let pick = match policy {
            GalaxyChoice::UniformRandom => self.items[rng.gen_range(0..self.items.len())],
            GalaxyChoice::LowMass | GalaxyChoice::HighMass => {
                let mut best = self.items[rng.gen_range(0..self.items.len())];
                for _ in 1..tries.max(1) {
                    let cand = self.items[rng.gen_range(0..self.items.len())];
                    let better = match policy {
                        GalaxyChoice::LowMass => mass[cand] < mass[best],
                        _ => mass[cand] > mass[best],
                    };
                    if better {
                        best = cand;
                    }
                }
                best
            }
        };
        self.remove(pick);
        Some(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn remove_keeps_positions_consistent() {
        let mut set = RandomNodeSet::full(5);
        assert!(set.remove(2));
        assert!(!set.remove(2));
        assert!(!set.contains(2));
        assert_eq!(set.len(), 4);
        for i in [0usize, 1, 3, 4] {
            assert!(set.contains(i));
        }
    }

    #[test]
    fn low_mass_bias_prefers_light_nodes() {
        let mut rng = StdRng::seed_from_u64(11);
        let mass = vec![100, 100, 1, 100, 100];
        let mut hits = 0;
        for _ in 0..50 {
            let mut set = RandomNodeSet::full(5);
            if set.draw(&mut rng, GalaxyChoice::LowMass, 10, &mass) == Some(2) {
                hits += 1;
            }
        }
        // 10 samples out of 5 items almost always see index 2.
        assert!(hits > 40, "hits = {hits}");
    }

    #[test]
    fn draw_exhausts_the_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mass = vec![1; 8];
        let mut set = RandomNodeSet::full(8);
        let mut seen = vec![false; 8];
        while let Some(i) = set.draw(&mut rng, GalaxyChoice::UniformRandom, 1, &mass) {
            assert!(!seen[i]);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
