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

use std::env;
use std::path::PathBuf;
use std::process;

use getopts::Options;
use log::error;

use recoeval::pipeline::{self, PreprocessConfig};
use recoeval::split::{FilterBy, SplitConfig, DEFAULT_RATIO, DEFAULT_SEED};

fn main() {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Raw ratings file (optional, defaults to \
        data/raw/ml-100k/u.data). The file must contain a user, item, rating and timestamp per \
        line, separated by tabs, without a header.", "PATH");
    opts.optopt("o", "outputdir", "Directory to write train.csv and test.csv to (optional, \
        defaults to data/interim/ml-100k). It is created if missing.", "PATH");
    opts.optopt("r", "ratio", "Share of each user's ratings that goes to the training set \
        (optional, defaults to 0.75).", "RATIO");
    opts.optopt("s", "seed", "Seed for shuffling the ratings (optional, defaults to 42).", "NUMBER");
    opts.optopt("m", "min-rating", "Drop users (or items) with fewer ratings (optional, \
        defaults to 1).", "NUMBER");
    opts.optopt("b", "filter-by", "Stratify on 'user' or 'item' (optional, defaults to user).",
        "COLUMN");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    let ratio: f64 = match matches.opt_get_default("r", DEFAULT_RATIO) {
        Ok(ratio) => ratio,
        Err(failure) => {
            let hint = format!("Problem with option 'r': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let seed: u64 = match matches.opt_get_default("s", DEFAULT_SEED) {
        Ok(seed) => seed,
        Err(failure) => {
            let hint = format!("Problem with option 's': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let min_rating: usize = match matches.opt_get_default("m", 1) {
        Ok(min_rating) => min_rating,
        Err(failure) => {
            let hint = format!("Problem with option 'm': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let filter_by: FilterBy = match matches.opt_get_default("b", FilterBy::User) {
        Ok(filter_by) => filter_by,
        Err(failure) => {
            let hint = format!("Problem with option 'b': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let defaults = PreprocessConfig::default();

    let config = PreprocessConfig {
        input: matches.opt_str("i").map(PathBuf::from).unwrap_or(defaults.input),
        output_dir: matches.opt_str("o").map(PathBuf::from).unwrap_or(defaults.output_dir),
        split: SplitConfig { ratios: vec![ratio], min_rating, filter_by, seed },
    };

    if let Err(failure) = pipeline::preprocess(&config) {
        error!("Preprocessing failed: {}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));

    if hint.is_some() {
        process::exit(2);
    }
}
