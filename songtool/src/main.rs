// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use clap::Parser;
use eyre::{Report, bail};
use log::{info, warn};
use songtext::{
    Song,
    convert::{ConverterConfig, convert_opensong_with},
    import_song,
    validate::{ValidatorConfig, validate_with},
};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

fn main() -> Result<(), Report> {
    pretty_env_logger::init();

    match Args::parse() {
        Args::Validate {
            path,
            warning_cap,
            max_slide_lines,
        } => {
            let raw = read_to_string(&path)?;
            let config = ValidatorConfig {
                warning_cap,
                max_slide_lines,
            };
            let validation = validate_with(&raw, &config);
            for message in validation.errors.iter().chain(&validation.warnings) {
                println!("{}: {message}", path.display());
            }
            if !validation.is_valid() {
                bail!(
                    "{} has {} error(s)",
                    path.display(),
                    validation.errors.len()
                );
            }
            info!("{} is valid", path.display());
        }
        Args::Convert {
            path,
            max_slide_lines,
        } => {
            let content = read_to_string(&path)?;
            if !opensong::is_opensong(&content) {
                bail!("{} is not an OpenSong song", path.display());
            }
            let converted =
                convert_opensong_with(&content, &file_stem(&path), &ConverterConfig {
                    max_slide_lines,
                });
            info!("Converted \"{}\"", converted.name);
            println!("{}", converted.raw);
        }
        Args::Print { path, json } => {
            let content = read_to_string(&path)?;
            let name = file_stem(&path);
            let song = import_song(&name, &name, &content)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&song)?);
            } else {
                print_song(&song);
            }
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
enum Args {
    /// Check the given raw song text file for mistakes.
    Validate {
        path: PathBuf,
        /// Maximum number of warnings to show for each kind of per-line problem.
        #[arg(long, default_value_t = 3)]
        warning_cap: usize,
        /// Maximum number of lines allowed on a slide.
        #[arg(long, default_value_t = 2)]
        max_slide_lines: usize,
    },
    /// Convert the given OpenSong file to raw song text on standard output.
    Convert {
        path: PathBuf,
        /// Longer slides are split to fit.
        #[arg(long, default_value_t = 2)]
        max_slide_lines: usize,
    },
    /// Print the slides of the given raw song text or OpenSong file in the order they are sung.
    Print {
        path: PathBuf,
        /// Print the parsed song as JSON instead.
        #[arg(long)]
        json: bool,
    },
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_song(song: &Song) {
    println!("= {} =", song.name);
    println!();
    for key in &song.arrangement {
        if song.part(key).is_none() {
            warn!("Skipping undefined part {key}.");
        }
    }

    let mut current_key = None;
    for (key, slide) in song.arranged_slides() {
        if current_key != Some(key) {
            println!("{key}:");
            current_key = Some(key);
        }
        for line in &slide.lines {
            println!("{line}");
        }
        println!();
    }
}
