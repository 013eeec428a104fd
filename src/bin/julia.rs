// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

use juliaseq::inputs::random_input;
use juliaseq::manifest::{write_caption, write_manifest};
use juliaseq::{load, OutputLayout, Pauses, Playback, Sequencer, TilePool};

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const RENDER: &str = "render";
const GENERATE: &str = "generate";
const INPUT: &str = "input";
const OUTPUT: &str = "output";
const THREADS: &str = "threads";
const PLAYBACK: &str = "playback";
const SEED: &str = "seed";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get().max(juliaseq::pool::DEFAULT_WORKERS);

    App::new("julia")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Julia set sequence renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(RENDER)
                .about("Render the frames described by an input file")
                .arg(
                    Arg::with_name(INPUT)
                        .long(INPUT)
                        .short("i")
                        .takes_value(true)
                        .default_value("input.json")
                        .help("Input file"),
                )
                .arg(
                    Arg::with_name(OUTPUT)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .default_value(".")
                        .help("Directory receiving images, frame list and caption"),
                )
                .arg(
                    Arg::with_name(THREADS)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .default_value("4")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                max_threads,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", max_threads),
                            )
                        })
                        .help("Number of tile worker threads"),
                )
                .arg(
                    Arg::with_name(PLAYBACK)
                        .long(PLAYBACK)
                        .short("p")
                        .takes_value(true)
                        .possible_values(&["loop", "forward", "reverse"])
                        .default_value("loop")
                        .help("Frame order written to the frame list"),
                ),
        )
        .subcommand(
            SubCommand::with_name(GENERATE)
                .about("Write a random input file")
                .arg(
                    Arg::with_name(OUTPUT)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .default_value("input.json")
                        .help("Input file to write"),
                )
                .arg(
                    Arg::with_name(SEED)
                        .long(SEED)
                        .short("s")
                        .takes_value(true)
                        .validator(|s| {
                            u64::from_str(&s)
                                .map(|_| ())
                                .map_err(|_| "Could not parse seed".to_string())
                        })
                        .help("Seed for a reproducible input file"),
                ),
        )
        .get_matches()
}

fn render(matches: &ArgMatches) -> juliaseq::Result<()> {
    let started = Instant::now();
    let job = load(matches.value_of(INPUT).unwrap_or("input.json"))?;
    let threads = matches
        .value_of(THREADS)
        .and_then(|s| usize::from_str(s).ok())
        .unwrap_or(juliaseq::pool::DEFAULT_WORKERS);
    let playback = Playback::from_str(matches.value_of(PLAYBACK).unwrap_or("loop"))?;
    let layout = OutputLayout::new(matches.value_of(OUTPUT).unwrap_or("."));

    let pool = TilePool::new(threads);

    info!(
        mode = job.mode.name(),
        frames = job.frames,
        threads = pool.workers(),
        output = %layout.root().display(),
        "rendering"
    );
    let report = Sequencer::new(&job, &layout, pool).run()?;
    write_manifest(&layout, &report.frames, playback, Pauses::default())?;
    write_caption(&layout, &report.caption)?;
    info!(
        assembled = report.frames.len(),
        seconds = started.elapsed().as_secs_f64(),
        "done"
    );
    Ok(())
}

fn generate(matches: &ArgMatches) -> juliaseq::Result<()> {
    let input = match matches.value_of(SEED).and_then(|s| u64::from_str(s).ok()) {
        Some(seed) => random_input(&mut StdRng::seed_from_u64(seed)),
        None => random_input(&mut rand::thread_rng()),
    };
    let path = matches.value_of(OUTPUT).unwrap_or("input.json");
    fs::write(path, input.to_json()?)?;
    info!(path, "input written");
    Ok(())
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let matches = args();
    let outcome = match matches.subcommand() {
        (RENDER, Some(sub)) => render(sub),
        (GENERATE, Some(sub)) => generate(sub),
        _ => Ok(()),
    };

    if let Err(e) = outcome {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
