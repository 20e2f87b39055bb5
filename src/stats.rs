use fnv::FnvHashSet;

use crate::types::{ItemId, Rating, UserId};

/// Basic statistics of a ratings table, used for progress reporting.
pub struct DatasetStats {
    users: FnvHashSet<UserId>,
    items: FnvHashSet<ItemId>,
    num_interactions: u64,
}

impl DatasetStats {

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }
}

impl<'a> From<&'a [Rating]> for DatasetStats {

    fn from(ratings: &'a [Rating]) -> Self {

        let mut users: FnvHashSet<UserId> =
            FnvHashSet::with_capacity_and_hasher(100, Default::default());
        let mut items: FnvHashSet<ItemId> =
            FnvHashSet::with_capacity_and_hasher(100, Default::default());

        for rating in ratings {
            users.insert(rating.user_id);
            items.insert(rating.item_id);
        }

        DatasetStats { users, items, num_interactions: ratings.len() as u64 }
    }
}
