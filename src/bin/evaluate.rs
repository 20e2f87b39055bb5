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
use std::io::stdout;
use std::path::PathBuf;
use std::process;

use getopts::Options;
use log::error;

use recoeval::pipeline::{self, EvaluateConfig, DEFAULT_TOP_K};
use recoeval::report::ReportFormat;

fn main() {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("m", "model", "Persisted model (optional, defaults to models/sar-best.json).",
        "PATH");
    opts.optopt("t", "testfile", "Test ratings as written by preprocess (optional, defaults to \
        data/interim/ml-100k/test.csv).", "PATH");
    opts.optopt("k", "top-k", "Number of items to recommend per user and cutoff of the \
        metrics (optional, defaults to 10).", "NUMBER");
    opts.optopt("f", "format", "Report layout, 'table' or 'block' (optional, defaults to table).",
        "FORMAT");
    opts.optopt("n", "model-name", "Model name shown in the report (optional, defaults to SAR).",
        "NAME");
    opts.optopt("o", "recommendations", "Also write the evaluated recommendations to this file \
        (optional).", "PATH");
    opts.optflag("", "keep-seen", "Allow recommending items the users already rated in training");
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

    let top_k: usize = match matches.opt_get_default("k", DEFAULT_TOP_K) {
        Ok(top_k) => top_k,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let format: ReportFormat = match matches.opt_get_default("f", ReportFormat::Table) {
        Ok(format) => format,
        Err(failure) => {
            let hint = format!("Problem with option 'f': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let defaults = EvaluateConfig::default();

    let config = EvaluateConfig {
        model_path: matches.opt_str("m").map(PathBuf::from).unwrap_or(defaults.model_path),
        test_path: matches.opt_str("t").map(PathBuf::from).unwrap_or(defaults.test_path),
        top_k,
        remove_seen: !matches.opt_present("keep-seen"),
        model_name: matches.opt_str("n").unwrap_or(defaults.model_name),
        format,
        recommendations_path: matches.opt_str("o").map(PathBuf::from),
    };

    let stdout = stdout();
    let mut out = stdout.lock();

    if let Err(failure) = pipeline::run_evaluation(&config, &mut out) {
        error!("Evaluation failed: {}", failure);
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
