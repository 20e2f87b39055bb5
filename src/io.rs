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

use std::fs::{self, File};
use std::path::Path;

use log::debug;

use crate::error::{RecoError, Result};
use crate::types::{Rating, Recommendation};

const RAW_NUM_COLUMNS: usize = 4;

/// Reads a raw ratings file. We expect NO headers, and a
/// `user_id, item_id, rating, timestamp` tuple per line with tab separation.
pub fn raw_csv_reader<P: AsRef<Path>>(file: P) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(file)?;

    Ok(reader)
}

pub fn read_raw_ratings<P: AsRef<Path>>(file: P) -> Result<Vec<Rating>> {
    let mut reader = raw_csv_reader(file)?;
    let mut ratings = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let record = result?;

        if record.len() != RAW_NUM_COLUMNS {
            return Err(RecoError::InvalidArgument(format!(
                "line {} has {} columns, expected {}",
                line + 1,
                record.len(),
                RAW_NUM_COLUMNS,
            )));
        }

        // The rating column is narrowed to 32 bit floats right here
        let rating: Rating = record.deserialize(None)?;
        ratings.push(rating);
    }

    debug!("Read {} raw ratings", ratings.len());

    Ok(ratings)
}

/// Reads a comma-separated partition with a header row, as written by [`write_ratings`].
pub fn read_ratings<P: AsRef<Path>>(file: P) -> Result<Vec<Rating>> {
    let mut reader = csv::Reader::from_path(file)?;

    let ratings = reader
        .deserialize()
        .collect::<std::result::Result<Vec<Rating>, csv::Error>>()?;

    Ok(ratings)
}

/// Writes ratings comma-separated with a header row and without any row index.
pub fn write_ratings<P: AsRef<Path>>(file: P, ratings: &[Rating]) -> Result<()> {
    let mut writer = csv::Writer::from_path(file)?;

    for rating in ratings {
        writer.serialize(rating)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_recommendations<P: AsRef<Path>>(
    file: P,
    recommendations: &[Recommendation],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(file)?;

    for recommendation in recommendations {
        writer.serialize(recommendation)?;
    }
    writer.flush()?;

    Ok(())
}

/// Creates the directory and all of its parents, an existing directory is fine.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_tab_separated_raw_ratings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "u.data", "196\t242\t3\t881250949\n186\t302\t3\t891717742\n");

        let ratings = read_raw_ratings(&path).unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], Rating::new(196, 242, 3.0, 881250949));
        assert_eq!(ratings[1].user_id, 186);
    }

    #[test]
    fn rejects_raw_file_with_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "u.data", "196\t242\t3\n");

        assert!(read_raw_ratings(&path).is_err());
    }

    #[test]
    fn rejects_non_numeric_rating() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "u.data", "196\t242\tgood\t881250949\n");

        assert!(read_raw_ratings(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_raw_ratings(dir.path().join("nope.data")).is_err());
        assert!(read_ratings(dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn written_partition_has_header_and_no_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.csv");

        write_ratings(&path, &[Rating::new(1, 2, 4.5, 100)]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "user_id,item_id,rating,timestamp\n1,2,4.5,100\n");
        assert_eq!(read_ratings(&path).unwrap(), vec![Rating::new(1, 2, 4.5, 100)]);
    }

    #[test]
    fn timestamp_column_is_optional_on_read() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "test.csv", "user_id,item_id,rating\n3,9,5.0\n");

        assert_eq!(read_ratings(&path).unwrap(), vec![Rating::new(3, 9, 5.0, 0)]);
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("interim").join("ml-100k");

        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();

        assert!(nested.is_dir());
    }
}
