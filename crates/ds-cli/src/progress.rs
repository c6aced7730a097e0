use std::time::Duration;

use ds_core::enums::EntityKind;
use ds_sync::SyncProgress;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

/// Spinner shown while a command waits on the network. Hidden unless
/// [`ui::prefs`] allows progress output.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// Feeds orchestrator phases into a spinner: `components 3/12: Button`.
pub struct SyncSpinner {
    progress: Progress,
    phase: &'static str,
    total: usize,
    done: usize,
}

impl SyncSpinner {
    #[must_use]
    pub fn new(progress: Progress) -> Self {
        Self {
            progress,
            phase: "",
            total: 0,
            done: 0,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }
}

fn phase_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Component => "components",
        EntityKind::Screen => "screens",
        EntityKind::Colors | EntityKind::Color => "colors",
        EntityKind::TextStyles | EntityKind::TextStyle => "text styles",
        EntityKind::Project => "project",
    }
}

impl SyncProgress for SyncSpinner {
    fn phase_started(&mut self, kind: EntityKind, total: usize) {
        self.phase = phase_label(kind);
        self.total = total;
        self.done = 0;
        self.progress
            .set_message(&format!("{} 0/{total}", self.phase));
    }

    fn item_synced(&mut self, _kind: EntityKind, name: &str) {
        self.done += 1;
        self.progress.set_message(&format!(
            "{} {}/{}: {name}",
            self.phase, self.done, self.total
        ));
    }
}
