// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tapline: command-line consumer for TAP streams
//!
//! Reads a TAP document from a file or stdin, parses it with a live
//! warning listener, and prints either a human summary or a JSON report.
//! Exits 1 when the session has failures or bailed out, 2 on usage or
//! I/O problems.

use std::fs::File;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tapline::TapParser;
use tracing::{error, info, warn};

use tapline_cli::config::{Config, Format};
use tapline_cli::report::SessionReport;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so piped summaries stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "tapline failed");
            ExitCode::from(2)
        }
    }
}

fn run(config: &Config) -> anyhow::Result<ExitCode> {
    config.validate()?;

    let parser = TapParser::new().on_error(|err| {
        warn!(error = %err, "TAP stream problem");
        Ok(())
    });

    let session = match &config.input {
        Some(path) => {
            info!(path = %path.display(), "parsing TAP file");
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parser.parse(file)?
        }
        None => {
            info!("parsing TAP from stdin");
            parser.parse(std::io::stdin().lock())?
        }
    };

    let report = SessionReport::from_session(session);
    match config.format {
        Format::Summary => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
