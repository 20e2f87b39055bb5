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

#[cfg(test)]
mod tests {

    use std::fs;
    use std::path::Path;

    use fnv::FnvHashSet;
    use tempfile::TempDir;

    use crate::io;
    use crate::model::{self, SarModel};
    use crate::pipeline::{self, EvaluateConfig, PreprocessConfig};
    use crate::report::ReportFormat;
    use crate::types::{SparseMatrix, SparseVector};

    /// 5 users rating 4 items, every pair five times, in MovieLens' raw format
    fn write_raw_ratings(path: &Path) {
        let mut lines = String::new();
        let mut timestamp = 881250949_u64;
        for repetition in 0..5_u32 {
            for user in 1..=5_u32 {
                for item in 1..=4_u32 {
                    let rating = (user * item + repetition) % 5 + 1;
                    lines.push_str(&format!("{}\t{}\t{}\t{}\n", user, item, rating, timestamp));
                    timestamp += 1;
                }
            }
        }
        fs::write(path, lines).unwrap();
    }

    fn sparse(entries: &[(u32, f32)]) -> SparseVector {
        entries.iter().cloned().collect()
    }

    #[test]
    fn preprocessing_end_to_end() {

        let workspace = TempDir::new().unwrap();
        let raw = workspace.path().join("u.data");
        write_raw_ratings(&raw);

        /* The output directory does not exist yet, preprocessing creates it */
        let config = PreprocessConfig {
            input: raw,
            output_dir: workspace.path().join("interim").join("ml-100k"),
            ..PreprocessConfig::default()
        };

        let summary = pipeline::preprocess(&config).unwrap();

        assert_eq!(summary.num_train, 75);
        assert_eq!(summary.num_test, 25);

        let first_train = fs::read(&summary.train_path).unwrap();
        let first_test = fs::read(&summary.test_path).unwrap();

        /* Running again into the now existing directory works and yields identical files */
        let again = pipeline::preprocess(&config).unwrap();
        assert_eq!(again, summary);
        assert_eq!(fs::read(&summary.train_path).unwrap(), first_train);
        assert_eq!(fs::read(&summary.test_path).unwrap(), first_test);

        let train = io::read_ratings(&summary.train_path).unwrap();
        let test = io::read_ratings(&summary.test_path).unwrap();

        /* Every test user has training data, and the partitions cover the input exactly once */
        let train_users: FnvHashSet<u32> = train.iter().map(|rating| rating.user_id).collect();
        assert!(test.iter().all(|rating| train_users.contains(&rating.user_id)));

        let mut timestamps: Vec<u64> =
            train.iter().chain(test.iter()).map(|rating| rating.timestamp).collect();
        timestamps.sort();
        timestamps.dedup();
        assert_eq!(timestamps.len(), 100);

        /* Ratings were stored as 32 bit floats and read back without loss */
        let raw_ratings = io::read_raw_ratings(&config.input).unwrap();
        for rating in train.iter().chain(test.iter()) {
            let original = raw_ratings.iter()
                .find(|raw| raw.timestamp == rating.timestamp)
                .unwrap();
            assert_eq!(original.rating.to_bits(), rating.rating.to_bits());
        }
    }

    #[test]
    fn evaluation_reports_golden_metrics() {

        let workspace = TempDir::new().unwrap();

        /* A stub model: user 1 has seen item 1, user 2 has seen item 2 */
        let mut user_affinity = SparseMatrix::default();
        user_affinity.insert(1, sparse(&[(1, 1.0)]));
        user_affinity.insert(2, sparse(&[(2, 1.0)]));

        let mut item_similarity = SparseMatrix::default();
        item_similarity.insert(1, sparse(&[(3, 0.9), (4, 0.5), (5, 0.1)]));
        item_similarity.insert(2, sparse(&[(4, 0.8), (5, 0.6)]));

        let model_path = workspace.path().join("sar-best.json");
        model::save_model(&model_path, &SarModel { user_affinity, item_similarity }).unwrap();

        let test_path = workspace.path().join("test.csv");
        fs::write(&test_path, "user_id,item_id,rating,timestamp\n1,4,5.0,1\n1,5,3.0,2\n2,4,4.0,3\n")
            .unwrap();

        let config = EvaluateConfig {
            model_path,
            test_path,
            top_k: 2,
            format: ReportFormat::Block,
            ..EvaluateConfig::default()
        };

        let mut out = Vec::new();
        let ranking_metrics = pipeline::run_evaluation(&config, &mut out).unwrap();

        /* User 1 gets items 3 and 4 (one hit at rank 2), user 2 gets items 4 and 5 (hit at rank 1) */
        assert!((ranking_metrics.precision - 0.5).abs() < 1e-9);
        assert!((ranking_metrics.recall - 0.75).abs() < 1e-9);
        assert!((ranking_metrics.map - 0.625).abs() < 1e-9);
        assert!((ranking_metrics.ndcg - (1.0 + 2f64.ln() / 6f64.ln()) / 2.0).abs() < 1e-9);

        let printed = String::from_utf8(out).unwrap();
        let (timing, report) = printed.split_at(printed.find('\n').unwrap() + 1);

        assert!(timing.starts_with("Took "));
        assert!(timing.ends_with(" seconds for prediction.\n"));
        assert_eq!(
            report,
            "Model:\tSAR\nTop K:\t2\nMAP:\t0.625000\nNDCG:\t0.693426\n\
             Precision@K:\t0.500000\nRecall@K:\t0.750000\n"
        );
    }

    #[test]
    fn evaluation_after_preprocessing() {

        let workspace = TempDir::new().unwrap();
        let raw = workspace.path().join("u.data");
        write_raw_ratings(&raw);

        let preprocess_config = PreprocessConfig {
            input: raw,
            output_dir: workspace.path().join("interim"),
            ..PreprocessConfig::default()
        };
        let summary = pipeline::preprocess(&preprocess_config).unwrap();

        /* Users' training ratings as affinities, every item mildly similar to every other one */
        let mut user_affinity = SparseMatrix::default();
        for rating in io::read_ratings(&summary.train_path).unwrap() {
            user_affinity.entry(rating.user_id).or_insert_with(SparseVector::default)
                .insert(rating.item_id, rating.rating);
        }

        let mut item_similarity = SparseMatrix::default();
        for item in 1..=6_u32 {
            item_similarity.insert(item, (1..=6_u32).map(|other| (other, 1.0 / (item + other) as f32)).collect());
        }

        let model_path = workspace.path().join("sar-best.json");
        model::save_model(&model_path, &SarModel { user_affinity, item_similarity }).unwrap();

        let config = EvaluateConfig {
            model_path,
            test_path: summary.test_path.clone(),
            recommendations_path: Some(workspace.path().join("recommendations.csv")),
            ..EvaluateConfig::default()
        };

        let mut out = Vec::new();
        let ranking_metrics = pipeline::run_evaluation(&config, &mut out).unwrap();

        for value in &[ranking_metrics.map, ranking_metrics.ndcg, ranking_metrics.precision, ranking_metrics.recall] {
            assert!(*value >= 0.0 && *value <= 1.0);
        }

        /* Nobody has seen the items 5 and 6 in training, so each user gets at least those two */
        let dumped = fs::read_to_string(workspace.path().join("recommendations.csv")).unwrap();
        assert!(dumped.lines().count() >= 1 + 5 * 2);
        assert!(String::from_utf8(out).unwrap().contains("| SAR | 10 |"));
    }

    #[test]
    fn evaluation_fails_for_missing_inputs() {

        let workspace = TempDir::new().unwrap();
        let config = EvaluateConfig {
            model_path: workspace.path().join("missing.json"),
            test_path: workspace.path().join("missing.csv"),
            ..EvaluateConfig::default()
        };

        let mut out = Vec::new();
        assert!(pipeline::run_evaluation(&config, &mut out).is_err());
        assert!(out.is_empty());
    }
}
