// src/config/options.rs
use std::path::PathBuf;

use super::consts::{DEFAULT_MAX_ROWS, DEFAULT_OUT_DIR};

/// Delivery channel picked for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NotifierKind {
    Telegram,
    Email,
    /// Dry run: render, log, send nothing.
    None,
}

impl NotifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotifierKind::Telegram => "telegram",
            NotifierKind::Email => "email",
            NotifierKind::None => "none",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub job: String,
    /// `None` means the job's own default channel.
    pub notifier: Option<NotifierKind>,
    pub out_dir: PathBuf,
    pub max_rows: usize,
}

impl RunOptions {
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            notifier: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    pub fn notifier(mut self, kind: NotifierKind) -> Self {
        self.notifier = Some(kind);
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn max_rows(mut self, n: usize) -> Self {
        self.max_rows = n.max(1);
        self
    }
}
