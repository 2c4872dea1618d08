// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Progress reporting for action dispatch
//!
//! The dispatcher reports each remote call here so the CLI can show what is
//! being worked on and, after a failed multi-resource run, how many resources
//! had already been processed.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

/// Create a spinner with consistent styling
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Progress update message
#[derive(Clone, Debug)]
pub enum ProgressUpdate {
    /// Fetching the application's managed resources
    FetchingResources { app: String },
    /// Selection finished
    Selected { count: usize },
    /// Listing actions of a resource
    Listing { resource: String },
    /// Running an action on a resource
    Running { action: String, resource: String },
    /// Action finished on a resource
    Applied { resource: String },
}

/// Progress reporter shared between the dispatcher and the CLI
pub struct ProgressReporter {
    sender: broadcast::Sender<ProgressUpdate>,
    /// Resources processed so far in the current dispatch
    done: AtomicUsize,
    /// Resources selected for the current dispatch
    total: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self {
            sender,
            done: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    /// Subscribe to progress updates
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.sender.subscribe()
    }

    /// Report inventory fetch
    pub fn fetching_resources(&self, app: &str) {
        let _ = self.sender.send(ProgressUpdate::FetchingResources {
            app: app.to_string(),
        });
    }

    /// Report selection result; resets the counters
    pub fn selected(&self, count: usize) {
        self.done.store(0, Ordering::SeqCst);
        self.total.store(count, Ordering::SeqCst);
        let _ = self.sender.send(ProgressUpdate::Selected { count });
    }

    /// Report listing actions for a resource
    pub fn listing(&self, resource: &str) {
        let _ = self.sender.send(ProgressUpdate::Listing {
            resource: resource.to_string(),
        });
    }

    /// Report running an action on a resource
    pub fn running(&self, action: &str, resource: &str) {
        let _ = self.sender.send(ProgressUpdate::Running {
            action: action.to_string(),
            resource: resource.to_string(),
        });
    }

    /// Report a resource processed
    pub fn applied(&self, resource: &str) {
        self.done.fetch_add(1, Ordering::SeqCst);
        let _ = self.sender.send(ProgressUpdate::Applied {
            resource: resource.to_string(),
        });
    }

    /// Get current progress (done/total)
    pub fn progress(&self) -> (usize, usize) {
        (
            self.done.load(Ordering::SeqCst),
            self.total.load(Ordering::SeqCst),
        )
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to progress reporter
pub type ProgressHandle = Arc<ProgressReporter>;

/// Create a new progress reporter handle
pub fn create_progress_handle() -> ProgressHandle {
    Arc::new(ProgressReporter::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_new() {
        let reporter = ProgressReporter::new();
        assert_eq!(reporter.progress(), (0, 0));
    }

    #[test]
    fn test_applied_increments() {
        let reporter = ProgressReporter::new();
        reporter.selected(3);
        assert_eq!(reporter.progress(), (0, 3));

        reporter.applied("a");
        reporter.applied("b");
        assert_eq!(reporter.progress(), (2, 3));
    }

    #[test]
    fn test_selected_resets_counters() {
        let reporter = ProgressReporter::new();
        reporter.selected(3);
        reporter.applied("a");
        assert_eq!(reporter.progress(), (1, 3));

        reporter.selected(2);
        assert_eq!(reporter.progress(), (0, 2));
    }

    #[test]
    fn test_subscribe_receives_updates() {
        let reporter = ProgressReporter::new();
        let mut receiver = reporter.subscribe();

        reporter.fetching_resources("guestbook");
        reporter.selected(1);
        reporter.running("restart", "apps/Deployment default/web");
        reporter.applied("apps/Deployment default/web");

        let updates: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok()).collect();
        assert_eq!(updates.len(), 4);
        assert!(matches!(
            &updates[0],
            ProgressUpdate::FetchingResources { app } if app == "guestbook"
        ));
        assert!(matches!(updates[1], ProgressUpdate::Selected { count: 1 }));
        assert!(matches!(
            &updates[2],
            ProgressUpdate::Running { action, .. } if action == "restart"
        ));
        assert!(matches!(updates[3], ProgressUpdate::Applied { .. }));
    }

    #[test]
    fn test_send_without_subscribers() {
        // Nobody listening is fine
        let handle = create_progress_handle();
        handle.listing("apps/Deployment default/web");
        assert_eq!(handle.progress(), (0, 0));
    }
}
