/**
 * recoeval
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp::Ordering;

use fnv::FnvHashMap;
use serde_derive::{Deserialize, Serialize};

pub type UserId = u32;
pub type ItemId = u32;

/// Weighted row of a sparse matrix, e.g. the items a user interacted with.
pub type SparseVector = FnvHashMap<ItemId, f32>;
pub type SparseMatrix = FnvHashMap<u32, SparseVector>;

/// A single observed rating. Field names double as the CSV header.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f32,
    #[serde(default)]
    pub timestamp: u64,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f32, timestamp: u64) -> Self {
        Rating { user_id, item_id, rating, timestamp }
    }
}

/// One row of a top-k recommendation table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub prediction: f32,
}

/// Result type used to find the top-k items per user via a binary heap
#[derive(PartialEq, Debug)]
pub struct ScoredItem {
    pub item: ItemId,
    pub score: f32,
}

/// Ordering for our max-heap: the "largest" element is the worst candidate, so that the top of a
/// bounded heap is the one to evict. Lower scores are worse, equal scores are broken by preferring
/// the smaller item id. There is no total order on floats, incomparable scores count as equal.
fn cmp_worst_first(scored_item_a: &ScoredItem, scored_item_b: &ScoredItem) -> Ordering {
    match scored_item_a.score.partial_cmp(&scored_item_b.score) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        _ => scored_item_a.item.cmp(&scored_item_b.item),
    }
}

impl Eq for ScoredItem {}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_worst_first(self, other)
    }
}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_worst_first(self, other))
    }
}
