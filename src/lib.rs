//! Train/test splitting and top-k ranking evaluation for recommendation models.
//!
//! The `preprocess` binary splits a raw ratings file into stratified train and test partitions,
//! the `evaluate` binary loads a persisted model, recommends items to the test users and reports
//! MAP, NDCG, Precision@K and Recall@K.

pub mod error;
pub mod io;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod split;
pub mod stats;
pub mod timer;
pub mod types;

mod usage_tests;

pub use crate::error::{RecoError, Result};
pub use crate::model::{Recommender, SarModel};
pub use crate::types::{Rating, Recommendation};
