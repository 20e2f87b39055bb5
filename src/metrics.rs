//! Ranking metrics comparing a top-k recommendation table against held-out ratings.
//!
//! Only users that appear in both tables are evaluated. For each of them the top-k
//! recommendations (by descending prediction) are joined with the user's held-out ratings; a
//! joined row is a hit at its 1-based rank. Users without hits still count towards the mean.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use fnv::FnvHashMap;

use crate::types::{ItemId, Rating, Recommendation, UserId};

/// How held-out ratings translate into gains for NDCG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relevance {
    /// Every held-out item has gain 1
    Binary,
    /// The rating itself is the gain
    Raw,
    /// `2^rating - 1`
    Exponential,
}

impl Relevance {
    fn gain(self, rating: f32) -> f64 {
        match self {
            Relevance::Binary => 1.0,
            Relevance::Raw => f64::from(rating),
            Relevance::Exponential => 2f64.powf(f64::from(rating)) - 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankingMetrics {
    pub k: usize,
    pub map: f64,
    pub ndcg: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Hits of a single user, `hits` holds `(rank, held-out rating)` in rank order.
#[derive(Debug, Default)]
struct UserHits {
    hits: Vec<(usize, f32)>,
    relevant: Vec<f32>,
}

impl UserHits {
    fn actual(&self) -> usize {
        self.relevant.len()
    }
}

/// The join of held-out ratings and top-k recommendations over the users both tables share.
struct RankingMerge {
    users: BTreeMap<UserId, UserHits>,
}

impl RankingMerge {

    fn new(test: &[Rating], recommendations: &[Recommendation], k: usize) -> Self {

        let mut relevant: FnvHashMap<UserId, Vec<(ItemId, f32)>> = FnvHashMap::default();
        for rating in test {
            relevant.entry(rating.user_id).or_insert_with(Vec::new).push((rating.item_id, rating.rating));
        }

        let mut ranked: FnvHashMap<UserId, Vec<&Recommendation>> = FnvHashMap::default();
        for recommendation in recommendations {
            ranked.entry(recommendation.user_id).or_insert_with(Vec::new).push(recommendation);
        }

        let mut users = BTreeMap::new();

        for (user, mut user_recommendations) in ranked {

            let held_out = match relevant.get(&user) {
                Some(held_out) => held_out,
                None => continue,
            };

            user_recommendations.sort_by(|a, b| {
                b.prediction
                    .partial_cmp(&a.prediction)
                    .unwrap_or(Ordering::Equal)
                    .then(a.item_id.cmp(&b.item_id))
            });

            let mut user_hits = UserHits {
                hits: Vec::new(),
                relevant: held_out.iter().map(|(_, rating)| *rating).collect(),
            };

            for (position, recommendation) in user_recommendations.iter().take(k).enumerate() {
                for (item, rating) in held_out.iter() {
                    if *item == recommendation.item_id {
                        user_hits.hits.push((position + 1, *rating));
                    }
                }
            }

            users.insert(user, user_hits);
        }

        RankingMerge { users }
    }

    fn n_users(&self) -> usize {
        self.users.len()
    }

    fn has_hits(&self) -> bool {
        self.users.values().any(|user_hits| !user_hits.hits.is_empty())
    }

    /// Mean over the shared users of a per-user score, zero when there is nothing to average.
    fn mean_over_users<F>(&self, per_user: F) -> f64
        where F: Fn(&UserHits) -> f64 {

        if !self.has_hits() {
            return 0.0;
        }

        let total: f64 = self.users.values().map(|user_hits| per_user(user_hits)).sum();
        total / self.n_users() as f64
    }
}

pub fn precision_at_k(test: &[Rating], recommendations: &[Recommendation], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    RankingMerge::new(test, recommendations, k)
        .mean_over_users(|user_hits| user_hits.hits.len() as f64 / k as f64)
}

pub fn recall_at_k(test: &[Rating], recommendations: &[Recommendation], k: usize) -> f64 {
    RankingMerge::new(test, recommendations, k)
        .mean_over_users(|user_hits| user_hits.hits.len() as f64 / user_hits.actual() as f64)
}

/// Mean average precision, each user's precision sum is normalized by its number of held-out items.
pub fn map_at_k(test: &[Rating], recommendations: &[Recommendation], k: usize) -> f64 {
    RankingMerge::new(test, recommendations, k).mean_over_users(|user_hits| {
        let precision_sum: f64 = user_hits
            .hits
            .iter()
            .enumerate()
            .map(|(hit_index, (rank, _))| (hit_index + 1) as f64 / *rank as f64)
            .sum();

        precision_sum / user_hits.actual() as f64
    })
}

/// NDCG with binary relevance and a natural-log discount.
pub fn ndcg_at_k(test: &[Rating], recommendations: &[Recommendation], k: usize) -> f64 {
    ndcg_at_k_with(test, recommendations, k, Relevance::Binary)
}

pub fn ndcg_at_k_with(
    test: &[Rating],
    recommendations: &[Recommendation],
    k: usize,
    relevance: Relevance,
) -> f64 {
    RankingMerge::new(test, recommendations, k).mean_over_users(|user_hits| {
        let dcg: f64 = user_hits
            .hits
            .iter()
            .map(|(rank, rating)| relevance.gain(*rating) / (1.0 + *rank as f64).ln())
            .sum();

        let mut ideal = user_hits.relevant.clone();
        ideal.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        let idcg: f64 = ideal
            .iter()
            .take(k)
            .enumerate()
            .map(|(position, rating)| relevance.gain(*rating) / (2.0 + position as f64).ln())
            .sum();

        if idcg == 0.0 { 0.0 } else { dcg / idcg }
    })
}

/// Computes MAP, NDCG, Precision@K and Recall@K in one go.
pub fn evaluate(test: &[Rating], recommendations: &[Recommendation], k: usize) -> RankingMetrics {
    RankingMetrics {
        k,
        map: map_at_k(test, recommendations, k),
        ndcg: ndcg_at_k(test, recommendations, k),
        precision: precision_at_k(test, recommendations, k),
        recall: recall_at_k(test, recommendations, k),
    }
}
