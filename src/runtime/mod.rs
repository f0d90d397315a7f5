use std::path::Path;

use clap::Parser;
use log::{info, warn};

use crate::artists::ArtistSplitter;
use crate::config::Settings;
use crate::dedup::{AlbumArtOutcome, ArtReconciler, CanonicalSource};
use crate::deluxe::DeluxeMerger;
use crate::donor::{DonorMatcher, FillOutcome};
use crate::tags::LoftyTagStore;

mod cli;
mod settings;

use cli::{Cli, Command};

fn init_logging(settings: &Settings, verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        settings.log.level.to_filter()
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}

fn dedupe_art(store: &LoftyTagStore, dir: &Path, settings: &Settings) {
    let results = ArtReconciler::new(store).reconcile_folder(dir, &settings.library);
    let mut rewritten = 0;
    let mut failed = 0;
    for (album, outcome) in &results {
        if let AlbumArtOutcome::Reconciled(report) = outcome {
            if report.source != CanonicalSource::Majority {
                info!("'{album}': art tie resolved by {:?}", report.source);
            }
            if !report.rewritten.is_empty() {
                info!(
                    "'{album}': {} file(s) now use art {}",
                    report.rewritten.len(),
                    report.canonical.short()
                );
            }
            rewritten += report.rewritten.len();
            failed += report.failed.len();
        }
    }
    info!(
        "Album art pass done: {} album(s), {rewritten} file(s) updated, {failed} failed",
        results.len()
    );
}

fn merge_deluxe(store: &LoftyTagStore, dir: &Path, settings: &Settings) {
    let report = DeluxeMerger::new(store, &settings.deluxe).merge_folder(dir, &settings.library);
    for (base, full) in &report.mapping {
        info!("'{base}' -> '{full}'");
    }
    for err in &report.failed {
        warn!("Skipped {}", err.path().display());
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = settings::load_settings();
    init_logging(&settings, cli.verbose);

    let store = LoftyTagStore::new();

    match cli.command {
        Command::DedupeArt { dir } => dedupe_art(&store, &dir, &settings),
        Command::MergeDeluxe { dir } => merge_deluxe(&store, &dir, &settings),
        Command::Cleanup { dir } => {
            merge_deluxe(&store, &dir, &settings);
            dedupe_art(&store, &dir, &settings);
        }
        Command::SplitArtists { dir } => {
            ArtistSplitter::new(&store).split_folder(&dir, &settings.library);
        }
        Command::Fill {
            new_file,
            dir,
            decrement,
        } => {
            let matcher = DonorMatcher::new(&store, &settings.matching, &settings.library);
            match matcher.fill_from_donor(&new_file, &dir, cli::direction(decrement)) {
                Ok(FillOutcome::Donor(found)) => {
                    info!("Metadata copied from {}", found.record.path.display())
                }
                Ok(FillOutcome::NoDonor) => info!("No donor; defaults applied"),
                Err(err) => warn!("Could not fill metadata: {err}"),
            }
        }
        Command::Config => print!("{}", settings.to_toml()?),
    }

    Ok(())
}
