// src/runner.rs
//! One pass over a job: FETCH every source, RENDER what came back, DELIVER once.
//!
//! Per-source trouble (`SourceError`, `RenderError`) is logged, recorded in the
//! [`RunSummary`] and skipped. Only a failed delivery ends the run with an error.

use std::path::PathBuf;

use crate::{
    deliver::{DeliveryBatch, DeliveryError, Notifier},
    progress::Progress,
    render::Renderer,
    series::ChartSpec,
    sources::{Source, SourceError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Upstream answered, nothing chartable in it.
    Empty,
    /// Outage, HTTP error or unreadable payload.
    Upstream,
    /// Chart could not be drawn or written.
    Render,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub kind: FailureKind,
    pub message: String,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub failures: Vec<SourceFailure>,
    /// Nothing rendered, so no notifier was called.
    pub delivery_skipped: bool,
}

impl RunSummary {
    pub fn delivered(&self) -> usize {
        if self.delivery_skipped { 0 } else { self.files_written.len() }
    }
}

fn fetch_failure(source: &str, err: &SourceError) -> SourceFailure {
    let kind = if err.is_empty() { FailureKind::Empty } else { FailureKind::Upstream };
    match kind {
        FailureKind::Empty => logw!("{source}: no data ({err})"),
        _ => loge!("{source}: fetch failed: {err}"),
    }
    SourceFailure { source: source.to_string(), kind, message: err.to_string() }
}

/// Run `sources` through the pipeline and hand the charts to `notifier`.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    sources: &[Box<dyn Source>],
    renderer: &mut Renderer,
    notifier: &dyn Notifier,
    subject: &str,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, DeliveryError> {
    let mut summary = RunSummary::default();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(sources.len());
    }

    // ---------- FETCH ----------
    let mut specs: Vec<(&str, ChartSpec)> = Vec::with_capacity(sources.len());
    for source in sources {
        logf!("Fetching {}", source.name());
        match source.chart() {
            Ok(spec) => specs.push((source.name(), spec)),
            Err(e) => {
                let failure = fetch_failure(source.name(), &e);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&failure.source, &failure.message);
                }
                summary.failures.push(failure);
            }
        }
    }

    // ---------- RENDER ----------
    let mut batch = DeliveryBatch::new();
    for (name, spec) in specs {
        match renderer.render(spec) {
            Ok(artifact) => {
                logf!("Chart: {}", artifact.path.display());
                summary.files_written.push(artifact.path.clone());
                batch.push(artifact);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(name);
                }
            }
            Err(e) => {
                loge!("{name}: render failed: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(name, &e.to_string());
                }
                summary.failures.push(SourceFailure {
                    source: name.to_string(),
                    kind: FailureKind::Render,
                    message: e.to_string(),
                });
            }
        }
    }

    // ---------- DELIVER ----------
    let delivered = if batch.is_empty() {
        logw!("No charts rendered; skipping delivery");
        summary.delivery_skipped = true;
        Ok(())
    } else {
        logf!("Delivering {} chart(s) via {}", batch.len(), notifier.name());
        notifier.deliver(batch, subject)
    };

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    delivered?;
    Ok(summary)
}
