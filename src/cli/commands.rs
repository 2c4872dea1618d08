// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::{ListArgs, RunArgs};
use crate::actions::{ActionDispatcher, ActionIdentifier, LegacyContext};
use crate::argocd::ApplicationService;
use crate::output::ActionTable;
use crate::progress::{ProgressHandle, ProgressUpdate, create_spinner};

/// `list APPNAME`: print the actions available on every matching resource
pub async fn list<S>(service: Arc<S>, progress: ProgressHandle, args: &ListArgs) -> Result<()>
where
    S: ApplicationService + ?Sized,
{
    let dispatcher = ActionDispatcher::new(service).with_progress(Arc::clone(&progress));
    let criteria = args.criteria();

    let available = with_spinner(&progress, dispatcher.list_actions(&args.app, &criteria)).await?;

    let table = ActionTable::new(available);
    println!("{}", table.format(&args.output, args.no_headers));
    Ok(())
}

/// `run APPNAME ACTION`: run one action on the selected resource(s)
pub async fn run<S>(service: Arc<S>, progress: ProgressHandle, args: &RunArgs) -> Result<()>
where
    S: ApplicationService + ?Sized,
{
    let legacy = LegacyContext {
        app: &args.app,
        kind: args.kind.as_deref(),
        resource_name: args.resource_name.as_deref(),
        namespace: args.namespace.as_deref(),
        all: args.all,
    };
    let parsed = ActionIdentifier::parse(&args.action, &legacy)?;
    if let Some(notice) = &parsed.deprecation {
        warn!(replacement = %notice.replacement, "Deprecated action syntax used");
        eprintln!("\n{}", notice);
    }

    let dispatcher = ActionDispatcher::new(service).with_progress(Arc::clone(&progress));
    let criteria = args.criteria();
    let action = &parsed.identifier;

    match with_spinner(&progress, dispatcher.run_action(&args.app, action, &criteria)).await {
        Ok(summary) => {
            if summary.applied.is_empty() {
                eprintln!("No matching resources, nothing to do");
            }
            for resource in &summary.applied {
                eprintln!("Action '{}' applied to {}", action.action, resource);
            }
            info!(app = %args.app, action = %action, count = summary.applied.len(), "Run complete");
            Ok(())
        }
        Err(e) => {
            if let Some(resource) = e.failed_resource() {
                warn!(app = %args.app, action = %action, resource = %resource, "Action failed");
            }
            let (done, total) = progress.progress();
            if done > 0 {
                eprintln!(
                    "Warning: action '{}' was already applied to {} of {} resources; \
                     those changes were not rolled back",
                    action.action, done, total
                );
            }
            Err(e.into())
        }
    }
}

/// Drive `work` while showing its progress updates on a spinner
async fn with_spinner<F, T>(progress: &ProgressHandle, work: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = create_spinner("Connecting to Argo CD...");
    let mut progress_rx = progress.subscribe();
    let mut work = Box::pin(work);

    let result = loop {
        tokio::select! {
            biased;
            result = &mut work => {
                break result;
            }
            update = progress_rx.recv() => {
                match update {
                    Ok(ProgressUpdate::FetchingResources { app }) => {
                        spinner.set_message(format!("Fetching resources of {}...", app));
                    }
                    Ok(ProgressUpdate::Selected { count }) => {
                        spinner.set_message(format!("{} resources selected", count));
                    }
                    Ok(ProgressUpdate::Listing { resource }) => {
                        spinner.set_message(format!("Listing actions of {}...", resource));
                    }
                    Ok(ProgressUpdate::Running { action, resource }) => {
                        spinner.set_message(format!("Running {} on {}...", action, resource));
                    }
                    Ok(ProgressUpdate::Applied { .. }) => {}
                    // Lagged or closed; the work future still decides when we stop
                    Err(_) => {}
                }
            }
        }
    };

    spinner.finish_and_clear();
    result
}
