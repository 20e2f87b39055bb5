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

use std::collections::{BTreeSet, BinaryHeap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use fnv::FnvHashMap;
use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::error::{RecoError, Result};
use crate::types::{ItemId, Rating, Recommendation, ScoredItem, SparseMatrix, SparseVector, UserId};

/// Anything that can produce top-k recommendations for the users of a ratings table.
pub trait Recommender {

    /// Recommends up to `top_k` items to every distinct user in `test`. With `remove_seen`,
    /// items the user already interacted with during training are never recommended.
    fn recommend_k_items(
        &self,
        test: &[Rating],
        top_k: usize,
        remove_seen: bool,
    ) -> Result<Vec<Recommendation>>;
}

/// A previously trained item-similarity model. A user's score for an item is the affinity-weighted
/// sum of the similarities between the items in the user's history and that item.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SarModel {
    /// Per user, the weight of each item in the user's training history
    pub user_affinity: SparseMatrix,
    /// Per item, the similarity to other items
    pub item_similarity: SparseMatrix,
}

impl SarModel {

    pub fn num_users(&self) -> usize {
        self.user_affinity.len()
    }

    /// All items the model can recommend, in ascending order.
    pub fn catalog(&self) -> BTreeSet<ItemId> {
        let mut items: BTreeSet<ItemId> = self.item_similarity.keys().cloned().collect();
        for similar_items in self.item_similarity.values() {
            items.extend(similar_items.keys());
        }
        items
    }

    fn scores_for(&self, affinity: &SparseVector) -> FnvHashMap<ItemId, f64> {
        let mut scores: FnvHashMap<ItemId, f64> = FnvHashMap::default();

        for (history_item, weight) in affinity.iter() {
            if let Some(similar_items) = self.item_similarity.get(history_item) {
                for (other_item, similarity) in similar_items.iter() {
                    *scores.entry(*other_item).or_insert(0.0) +=
                        f64::from(*weight) * f64::from(*similarity);
                }
            }
        }

        scores
    }
}

impl Recommender for SarModel {

    fn recommend_k_items(
        &self,
        test: &[Rating],
        top_k: usize,
        remove_seen: bool,
    ) -> Result<Vec<Recommendation>> {

        let users: BTreeSet<UserId> = test.iter().map(|rating| rating.user_id).collect();
        let catalog = self.catalog();

        // Nobody can get more items than the catalog holds
        let top_k = top_k.min(catalog.len());

        let mut recommendations = Vec::with_capacity(users.len() * top_k);

        for user in users {
            let affinity = self.user_affinity.get(&user).ok_or(RecoError::UnknownUser(user))?;
            let scores = self.scores_for(affinity);

            let mut heap = BinaryHeap::with_capacity(top_k + 1);

            for item in catalog.iter() {

                if remove_seen && affinity.contains_key(item) {
                    continue;
                }

                let score = scores.get(item).cloned().unwrap_or(0.0) as f32;
                let scored_item = ScoredItem { item: *item, score };

                if heap.len() < top_k {
                    heap.push(scored_item);
                } else if let Some(mut top) = heap.peek_mut() {
                    if scored_item < *top {
                        *top = scored_item;
                    }
                }
            }

            recommendations.extend(heap.into_sorted_vec().into_iter().map(|scored_item| {
                Recommendation { user_id: user, item_id: scored_item.item, prediction: scored_item.score }
            }));
        }

        debug!("Computed {} recommendations", recommendations.len());

        Ok(recommendations)
    }
}

/// Deserializes a persisted model.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SarModel> {
    let file = File::open(path)?;
    let model = serde_json::from_reader(BufReader::new(file))?;
    Ok(model)
}

pub fn save_model<P: AsRef<Path>>(path: P, model: &SarModel) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, model)?;
    writer.flush()?;
    Ok(())
}
