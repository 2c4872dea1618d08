// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod actions;
mod argocd;
mod cli;
pub mod config;
mod output;
pub mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use argocd::ArgoCdClient;
use cli::{Args, Command};

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    // Create log directory
    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // File appender with size-based rotation:
    // - Max 10MB per file
    // - Keep up to 5 files (total max ~50MB)
    // - Also rotate daily
    let log_path = log_dir.join("argocd-actions.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024); // 10MB

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    // Use non-blocking writer so remote calls are not held up by disk I/O
    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose {
        "argocd_actions=debug"
    } else {
        "argocd_actions=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    // File layer (always enabled)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        // Both file and stderr output
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        // File only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    // - Always log to file (~/.argocd-actions/log/argocd-actions.log)
    // - With -v, also log to stderr
    init_logging(args.verbose);

    let config_path = match &args.connection.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let local = config::LocalConfig::load(&config_path)?;
    let options = config::resolve_client_options(&local, args.connection.overrides())?;
    tracing::debug!(
        config = %config_path.display(),
        server = %options.server,
        "Resolved connection settings"
    );

    let client = Arc::new(
        ArgoCdClient::new(options).context("Failed to create Argo CD client")?,
    );
    let progress = progress::create_progress_handle();

    match &args.command {
        Command::List(list) => cli::commands::list(client, progress, list).await,
        Command::Run(run) => cli::commands::run(client, progress, run).await,
    }
}
