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

use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::Result;
use crate::io;
use crate::metrics::{self, RankingMetrics};
use crate::model::{self, Recommender};
use crate::report::ReportFormat;
use crate::split::{self, SplitConfig};
use crate::stats::DatasetStats;
use crate::timer::Timer;
use crate::types::Rating;

pub const DEFAULT_RAW_RATINGS: &str = "data/raw/ml-100k/u.data";
pub const DEFAULT_OUTPUT_DIR: &str = "data/interim/ml-100k";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const DEFAULT_MODEL: &str = "models/sar-best.json";
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MODEL_NAME: &str = "SAR";

#[derive(Clone, Debug)]
pub struct PreprocessConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub split: SplitConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig {
            input: PathBuf::from(DEFAULT_RAW_RATINGS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            split: SplitConfig::default(),
        }
    }
}

impl PreprocessConfig {

    pub fn train_path(&self) -> PathBuf {
        self.output_dir.join(TRAIN_FILE)
    }

    pub fn test_path(&self) -> PathBuf {
        self.output_dir.join(TEST_FILE)
    }
}

#[derive(Debug, PartialEq)]
pub struct PreprocessSummary {
    pub num_train: usize,
    pub num_test: usize,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

/// Reads the raw ratings, splits them per user and writes both partitions.
pub fn preprocess(config: &PreprocessConfig) -> Result<PreprocessSummary> {

    info!("Reading {} to split into train and test", config.input.display());
    let ratings = io::read_raw_ratings(&config.input)?;

    let stats = DatasetStats::from(&ratings[..]);
    info!(
        "Found {} interactions between {} users and {} items.",
        stats.num_interactions(),
        stats.num_users(),
        stats.num_items(),
    );

    let (train, test) = split::stratified_split(&ratings, &config.split)?;
    info!(
        "Split into {} train and {} test interactions (ratios {:?}, seed {})",
        train.len(),
        test.len(),
        config.split.ratios,
        config.split.seed,
    );

    io::ensure_dir(&config.output_dir)?;

    let train_path = config.train_path();
    let test_path = config.test_path();

    info!("Writing {} and {}", train_path.display(), test_path.display());
    io::write_ratings(&train_path, &train)?;
    io::write_ratings(&test_path, &test)?;

    Ok(PreprocessSummary { num_train: train.len(), num_test: test.len(), train_path, test_path })
}

#[derive(Clone, Debug)]
pub struct EvaluateConfig {
    pub model_path: PathBuf,
    pub test_path: PathBuf,
    pub top_k: usize,
    pub remove_seen: bool,
    pub model_name: String,
    pub format: ReportFormat,
    /// Where to dump the evaluated recommendations, if anywhere
    pub recommendations_path: Option<PathBuf>,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        EvaluateConfig {
            model_path: PathBuf::from(DEFAULT_MODEL),
            test_path: PathBuf::from(DEFAULT_OUTPUT_DIR).join(TEST_FILE),
            top_k: DEFAULT_TOP_K,
            remove_seen: true,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            format: ReportFormat::default(),
            recommendations_path: None,
        }
    }
}

/// Times a top-k recommendation call, recomputes the recommendations, scores them against
/// the test ratings and writes the timing line and the report to `out`.
pub fn evaluate<M, W>(
    model: &M,
    test: &[Rating],
    config: &EvaluateConfig,
    out: &mut W,
) -> Result<RankingMetrics>
    where M: Recommender + ?Sized, W: Write {

    let stats = DatasetStats::from(test);
    info!(
        "Recommending {} items each to {} test users",
        config.top_k,
        stats.num_users(),
    );

    let mut timer = Timer::new();
    let timed = timer.time(|| model.recommend_k_items(test, config.top_k, config.remove_seen));
    if timed.is_err() {
        warn!("Prediction failed after {} seconds", timer);
    }
    // Only the duration of the timed call matters
    timed?;

    writeln!(out, "Took {} seconds for prediction.", timer.interval())?;

    let top_k = model.recommend_k_items(test, config.top_k, config.remove_seen)?;

    if let Some(path) = &config.recommendations_path {
        info!("Writing {} recommendations to {}", top_k.len(), path.display());
        io::write_recommendations(path, &top_k)?;
    }

    let ranking_metrics = metrics::evaluate(test, &top_k, config.top_k);

    write!(out, "{}", config.format.render(&config.model_name, &ranking_metrics))?;

    Ok(ranking_metrics)
}

/// Loads the persisted model and the test partition, then runs [`evaluate`].
pub fn run_evaluation<W: Write>(config: &EvaluateConfig, out: &mut W) -> Result<RankingMetrics> {

    info!("Loading model from {}", config.model_path.display());
    let model = model::load_model(&config.model_path)?;
    info!(
        "Loaded model with {} users and {} items",
        model.num_users(),
        model.catalog().len(),
    );

    info!("Reading test ratings from {}", config.test_path.display());
    let test = io::read_ratings(&config.test_path)?;

    evaluate(&model, &test, config, out)
}
