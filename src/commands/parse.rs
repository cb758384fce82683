//! Parse subcommand handler: decode a single raw segment.

use std::io::Read;

use anyhow::{Context, Result};

use akr::reconstruct::reconstruct_segment;

/// Decode one escape-coded segment (argument or stdin) and print the
/// reconstructed text. An aborted segment prints an empty line, the same
/// way it would be recorded in a run.
#[cfg(not(tarpaulin_include))]
pub fn handle_parse(segment: Option<&str>) -> Result<()> {
    let raw = match segment {
        Some(segment) => segment.to_string(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read segment from stdin")?;
            buffer.trim_end_matches('\n').to_string()
        }
    };

    let reconstruction = reconstruct_segment(&raw);
    println!("{}", reconstruction.text);
    Ok(())
}
