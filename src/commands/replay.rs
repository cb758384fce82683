//! Replay subcommand handler.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use akr::ingest::{run_pipeline, RunStats};
use akr::output::Artifacts;
use akr::replay::HttpsQueryClient;
use akr::Config;

pub struct ReplayOptions {
    pub log: PathBuf,
    pub dry_run: bool,
    pub host: Option<String>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub insecure: bool,
}

/// Run the full pipeline over an audit log.
#[cfg(not(tarpaulin_include))]
pub fn handle_replay(options: ReplayOptions) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(host) = options.host {
        config.query.host = host;
    }
    if let Some(cert) = options.cert {
        config.query.client_cert = cert;
    }
    if let Some(key) = options.key {
        config.query.client_key = key;
    }
    if let Some(out_dir) = options.out_dir {
        config.output.directory = out_dir;
    }
    if options.insecure {
        config.query.danger_accept_invalid_certs = true;
    }

    let file = File::open(&options.log)
        .with_context(|| format!("failed to open audit log: {}", options.log.display()))?;
    let reader = BufReader::new(file);

    let mut artifacts = Artifacts::create(&config.output)?;

    let stats = if options.dry_run {
        info!("dry run: skipping the network, writing artifacts only");
        run_pipeline(reader, None, &mut artifacts)?
    } else {
        let client = HttpsQueryClient::new(&config.query)?;
        run_pipeline(reader, Some(&client), &mut artifacts)?
    };

    artifacts.finish()?;
    print_summary(&stats);
    Ok(())
}

fn print_summary(stats: &RunStats) {
    info!(
        lines = stats.lines_read,
        skipped = stats.lines_skipped,
        empty = stats.empty_after_parse,
        duplicates = stats.duplicates,
        qualifying = stats.qualifying,
        succeeded = stats.replay_succeeded,
        failed = stats.replay_failed,
        "run complete"
    );
    if stats.malformed_escapes > 0 {
        warn!(
            count = stats.malformed_escapes,
            "segments contained escape sequences outside the capture dialect"
        );
    }
    if stats.history_errors > 0 {
        warn!(
            count = stats.history_errors,
            "recalls could not be resolved; those lines were dropped"
        );
    }

    println!("Lines read:        {}", stats.lines_read);
    println!("  without segment: {}", stats.lines_skipped);
    println!("  empty/aborted:   {}", stats.empty_after_parse);
    println!("  duplicates:      {}", stats.duplicates);
    println!("Qualifying:        {}", stats.qualifying);
    println!("  replay ok:       {}", stats.replay_succeeded);
    println!("  replay failed:   {}", stats.replay_failed);
}
