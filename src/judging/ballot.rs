use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

/// Merge a judge's saved ranking into the current candidate list.
///
/// Previously ranked candidates come first, in saved-rank order; candidates
/// the judge has not ranked yet follow, keeping their relative order in
/// `candidate_ids`. A saved id whose candidate no longer exists is dropped
/// silently, so stale votes never error out a ballot view.
pub fn build_order(candidate_ids: &[i32], saved_ranked_ids: &[i32]) -> Vec<i32> {
    let current: HashSet<i32> = candidate_ids.iter().copied().collect();

    let mut order: Vec<i32> = saved_ranked_ids
        .iter()
        .copied()
        .filter(|id| current.contains(id))
        .collect();

    let ranked: HashSet<i32> = order.iter().copied().collect();
    order.extend(candidate_ids.iter().copied().filter(|id| !ranked.contains(id)));
    order
}

/// A shuffled candidate order drawn once per session for judges with no saved
/// votes, so repeated ballot views don't reshuffle under them. The cache
/// remembers which candidate set it was drawn for and is discarded when that
/// set changes.
#[derive(Clone, Debug)]
pub struct ShuffleCache {
    order: Vec<i32>,
}

impl ShuffleCache {
    pub fn draw<R: Rng>(candidate_ids: &[i32], rng: &mut R) -> ShuffleCache {
        let mut order = candidate_ids.to_vec();
        order.shuffle(rng);
        ShuffleCache { order }
    }

    /// True if this cache was drawn for exactly this candidate set.
    pub fn matches(&self, candidate_ids: &[i32]) -> bool {
        if self.order.len() != candidate_ids.len() {
            return false;
        }
        let cached: HashSet<i32> = self.order.iter().copied().collect();
        candidate_ids.iter().all(|id| cached.contains(id))
    }

    pub fn order(&self) -> &[i32] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ranked_prefix_then_unranked_in_candidate_order() {
        let order = build_order(&[1, 2, 3], &[3, 1]);
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn deleted_candidates_drop_from_ranked_prefix() {
        // candidate 9 was voted on but has since been removed
        let order = build_order(&[1, 2, 3], &[9, 2]);
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn no_saved_votes_keeps_candidate_order() {
        let order = build_order(&[5, 6, 7], &[]);
        assert_eq!(order, vec![5, 6, 7]);
    }

    #[test]
    fn every_candidate_appears_exactly_once() {
        let order = build_order(&[4, 8, 15, 16, 23, 42], &[42, 8]);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![4, 8, 15, 16, 23, 42]);
        assert_eq!(order[0], 42);
        assert_eq!(order[1], 8);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let cache = ShuffleCache::draw(&[1, 2, 3, 4, 5], &mut rng);
        let mut sorted = cache.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn shuffle_cache_invalidates_when_candidates_change() {
        let mut rng = StdRng::seed_from_u64(7);
        let cache = ShuffleCache::draw(&[1, 2, 3], &mut rng);
        assert!(cache.matches(&[3, 2, 1]));
        assert!(!cache.matches(&[1, 2]));
        assert!(!cache.matches(&[1, 2, 4]));
    }
}
