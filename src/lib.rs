//! akr - Audit Keystroke Replayer.
//!
//! Reconstructs what an operator actually typed from keystroke-level
//! terminal audit logs (in-place edits, cursor movement, and history
//! recalls included), then classifies the reconstructed commands and
//! replays the query invocations among them against the remote capture
//! service, recording every result.
//!
//! Module map:
//!
//! - [`reconstruct`] - escape decoding, line-editor emulation, history
//!   recall correlation
//! - [`ingest`] - audit-log segment extraction, classification, and the
//!   per-line pipeline driver
//! - [`replay`] - the mutual-TLS query client behind a service trait
//! - [`output`] - the four run artifacts
//! - [`config`] - TOML configuration

pub mod config;
pub mod ingest;
pub mod output;
pub mod reconstruct;
pub mod replay;

pub use config::Config;
