//! Headless engine driver (default binary).
//!
//! Reads one command per line on stdin (`start`, `moveLeft`, `hardDrop`,
//! `setDifficulty:hard`, ...) and writes one JSON object per line on stdout:
//! the snapshot after each command, or an error for unparsable input.
//! Blank lines and lines starting with `#` are skipped.
//!
//! Configuration comes from `TETRIS_*` environment variables, logging from `RUST_LOG`
//! (written to stderr so stdout stays machine-readable).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use tetris_engine::core::GameSnapshot;
use tetris_engine::session::Session;
use tetris_engine::types::Command;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Output<'a> {
    Snapshot {
        command: Option<&'static str>,
        accepted: bool,
        snapshot: &'a GameSnapshot,
    },
    Error {
        line: usize,
        code: &'static str,
        message: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut session = Session::from_env();
    info!(
        "driver ready: {}x{} board",
        session.snapshot().width,
        session.snapshot().height
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(
        &mut out,
        &Output::Snapshot {
            command: None,
            accepted: true,
            snapshot: session.snapshot(),
        },
    )?;

    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read command from stdin")?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match Command::parse(text) {
            Ok(command) => {
                let accepted = session.apply(command);
                emit(
                    &mut out,
                    &Output::Snapshot {
                        command: Some(command.as_str()),
                        accepted,
                        snapshot: session.snapshot(),
                    },
                )?;
            }
            Err(err) => {
                warn!("line {}: {}", index + 1, err);
                emit(
                    &mut out,
                    &Output::Error {
                        line: index + 1,
                        code: err.code(),
                        message: err.message(),
                    },
                )?;
            }
        }
    }

    Ok(())
}

fn emit(out: &mut impl Write, output: &Output<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, output).context("failed to encode output")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
