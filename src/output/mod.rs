//! Output artifacts for a replay run.
//!
//! Four files, written side by side in the output directory:
//!
//! - commands file: every resolved command, one per line, duplicates
//!   included;
//! - responses file: the raw JSON bodies of successful replays, wrapped in
//!   `[`...`]`. Each body is followed by a comma, so the file carries a
//!   trailing separator before the closing bracket - the historical format
//!   of these runs, kept byte-compatible rather than fixed (see DESIGN.md);
//! - transcript: Markdown pairing each forwarded payload with the
//!   service's answer, angle brackets escaped;
//! - error file: payloads the service rejected, with status and body.
//!
//! [`Artifacts::finish`] writes the closing bracket; on a fatal abort it is
//! never called and the responses file stays unterminated, matching the
//! historical runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::OutputConfig;

pub struct Artifacts {
    commands: BufWriter<File>,
    responses: BufWriter<File>,
    transcript: BufWriter<File>,
    errors: BufWriter<File>,
}

impl Artifacts {
    /// Create all four files (truncating any previous run) and open the
    /// responses list.
    pub fn create(config: &OutputConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.directory).with_context(|| {
            format!(
                "failed to create output directory: {}",
                config.directory.display()
            )
        })?;

        let open = |name: &str| -> Result<BufWriter<File>> {
            let path: PathBuf = config.directory.join(name);
            let file = File::create(&path)
                .with_context(|| format!("failed to create artifact: {}", path.display()))?;
            Ok(BufWriter::new(file))
        };

        let commands = open(&config.commands)?;
        let mut responses = open(&config.responses)?;
        let transcript = open(&config.transcript)?;
        let errors = open(&config.errors)?;

        responses.write_all(b"[")?;

        Ok(Self {
            commands,
            responses,
            transcript,
            errors,
        })
    }

    /// Every resolved command lands here, qualifying or not.
    pub fn record_command(&mut self, command: &str) -> Result<()> {
        writeln!(self.commands, "{command}")?;
        Ok(())
    }

    /// A successful replay: raw body into the responses list, formatted
    /// entry into the transcript.
    pub fn record_success(&mut self, payload: &str, raw_body: &str, text: &str) -> Result<()> {
        write!(self.responses, "{raw_body},")?;

        writeln!(self.transcript, "# Command")?;
        writeln!(self.transcript, "{payload}")?;
        writeln!(self.transcript, "# Response")?;
        writeln!(self.transcript, "{}", escape_angle_brackets(text))?;
        Ok(())
    }

    /// The service rejected the payload.
    pub fn record_failure(&mut self, payload: &str, status: u16, body: &str) -> Result<()> {
        writeln!(self.errors, "{payload}")?;
        writeln!(self.errors, "{status} | {body}")?;
        writeln!(self.errors)?;
        Ok(())
    }

    /// The request never completed; record what we know and move on.
    pub fn record_transport_failure(
        &mut self,
        payload: &str,
        error: &dyn std::fmt::Display,
    ) -> Result<()> {
        writeln!(self.errors, "{payload}")?;
        writeln!(self.errors, "transport | {error}")?;
        writeln!(self.errors)?;
        Ok(())
    }

    /// Close the responses list and flush everything.
    pub fn finish(mut self) -> Result<()> {
        self.responses.write_all(b"]")?;
        self.commands.flush()?;
        self.responses.flush()?;
        self.transcript.flush()?;
        self.errors.flush()?;
        Ok(())
    }
}

fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "\\<").replace('>', "\\>")
}
