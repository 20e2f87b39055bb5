//! Stratified train/test splitting of ratings.
//!
//! Ratings are grouped per user (or per item), every group is shuffled with an explicitly seeded
//! RNG and cut according to the split ratios. The i-th slice of every group lands in partition i,
//! so each user keeps roughly the same share of its ratings in every partition.

use std::collections::BTreeMap;
use std::str::FromStr;

use fnv::FnvHashMap;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{RecoError, Result};
use crate::types::Rating;

pub const DEFAULT_RATIO: f64 = 0.75;
pub const DEFAULT_SEED: u64 = 42;

/// The column the ratings are stratified on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterBy {
    User,
    Item,
}

impl FilterBy {
    fn key(self, rating: &Rating) -> u32 {
        match self {
            FilterBy::User => rating.user_id,
            FilterBy::Item => rating.item_id,
        }
    }
}

impl FromStr for FilterBy {
    type Err = RecoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(FilterBy::User),
            "item" => Ok(FilterBy::Item),
            other => Err(RecoError::InvalidArgument(format!(
                "filter_by must be 'user' or 'item', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// A single ratio in (0, 1) for a train/test split, or one weight per partition.
    pub ratios: Vec<f64>,
    /// Users (or items) with fewer ratings are dropped before splitting.
    pub min_rating: usize,
    pub filter_by: FilterBy,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            ratios: vec![DEFAULT_RATIO],
            min_rating: 1,
            filter_by: FilterBy::User,
            seed: DEFAULT_SEED,
        }
    }
}

/// Expands the configured ratios into one fraction per partition, summing to one.
pub fn process_split_ratios(ratios: &[f64]) -> Result<Vec<f64>> {
    match ratios {
        [] => Err(RecoError::InvalidRatio("no split ratio given".to_string())),
        [ratio] => {
            if !(*ratio > 0.0 && *ratio < 1.0) {
                return Err(RecoError::InvalidRatio(format!(
                    "{} is not strictly between 0 and 1",
                    ratio
                )));
            }
            Ok(vec![*ratio, 1.0 - *ratio])
        }
        _ => {
            if ratios.iter().any(|ratio| !(*ratio > 0.0 && ratio.is_finite())) {
                return Err(RecoError::InvalidRatio(format!(
                    "all ratios must be positive and finite, got {:?}",
                    ratios
                )));
            }
            let total: f64 = ratios.iter().sum();
            if (total - 1.0).abs() > 1e-9 {
                debug!("Normalizing split ratios {:?} which sum to {}", ratios, total);
                Ok(ratios.iter().map(|ratio| ratio / total).collect())
            } else {
                Ok(ratios.to_vec())
            }
        }
    }
}

/// Keeps only the ratings of users (or items) with at least `min_rating` ratings, in input order.
pub fn min_rating_filter(ratings: &[Rating], min_rating: usize, filter_by: FilterBy) -> Vec<Rating> {
    let mut counts: FnvHashMap<u32, usize> = FnvHashMap::default();
    for rating in ratings {
        *counts.entry(filter_by.key(rating)).or_insert(0) += 1;
    }

    ratings
        .iter()
        .filter(|rating| counts[&filter_by.key(rating)] >= min_rating)
        .cloned()
        .collect()
}

/// Rounds half-way cases to the nearest even number, e.g. 4.5 to 4 and 5.5 to 6.
pub fn round_half_even(value: f64) -> usize {
    let floor = value.floor();
    let fraction = value - floor;

    let rounded = if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };

    rounded.max(0.0) as usize
}

/// Positions at which a group of `group_len` ratings is cut into partitions.
fn cut_points(ratios: &[f64], group_len: usize) -> Vec<usize> {
    let mut cumulative = 0.0;
    let mut previous = 0;

    ratios[..ratios.len() - 1]
        .iter()
        .map(|ratio| {
            cumulative += ratio;
            let point = round_half_even(cumulative * group_len as f64)
                .min(group_len)
                .max(previous);
            previous = point;
            point
        })
        .collect()
}

/// Splits the ratings into one partition per ratio, stratified on `config.filter_by`.
pub fn stratified_split_multi(ratings: &[Rating], config: &SplitConfig) -> Result<Vec<Vec<Rating>>> {
    if config.min_rating < 1 {
        return Err(RecoError::InvalidArgument(format!(
            "min_rating must be at least 1, got {}",
            config.min_rating
        )));
    }

    let ratios = process_split_ratios(&config.ratios)?;

    let filtered;
    let ratings = if config.min_rating > 1 {
        filtered = min_rating_filter(ratings, config.min_rating, config.filter_by);
        &filtered[..]
    } else {
        ratings
    };

    // Groups are visited in ascending key order, rows keep their input order within a group
    let mut groups: BTreeMap<u32, Vec<&Rating>> = BTreeMap::new();
    for rating in ratings {
        groups.entry(config.filter_by.key(rating)).or_insert_with(Vec::new).push(rating);
    }

    let mut partitions: Vec<Vec<Rating>> = vec![Vec::new(); ratios.len()];

    for (_, mut group) in groups {
        let mut rng = StdRng::seed_from_u64(config.seed);
        group.shuffle(&mut rng);

        let mut start = 0;
        let mut bounds = cut_points(&ratios, group.len());
        bounds.push(group.len());

        for (partition, end) in partitions.iter_mut().zip(bounds) {
            partition.extend(group[start..end].iter().map(|rating| (*rating).clone()));
            start = end;
        }
    }

    Ok(partitions)
}

/// Two-way convenience over [`stratified_split_multi`], returns `(train, test)`.
pub fn stratified_split(ratings: &[Rating], config: &SplitConfig) -> Result<(Vec<Rating>, Vec<Rating>)> {
    if config.ratios.len() > 2 {
        return Err(RecoError::InvalidRatio(format!(
            "a train/test split needs one or two ratios, got {}",
            config.ratios.len()
        )));
    }

    let mut partitions = stratified_split_multi(ratings, config)?.into_iter();

    match (partitions.next(), partitions.next()) {
        (Some(train), Some(test)) => Ok((train, test)),
        _ => Err(RecoError::InvalidRatio("split produced fewer than two partitions".to_string())),
    }
}
