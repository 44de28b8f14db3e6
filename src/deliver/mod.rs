// src/deliver/mod.rs
//! Collect rendered charts and hand them to one delivery channel.
//!
//! A [`DeliveryBatch`] fills up in the order sources succeed and is consumed by a
//! single [`Notifier::deliver`] call. An empty batch never reaches a notifier; the
//! runner skips delivery instead.

use std::{io, path::PathBuf};

use thiserror::Error;

pub mod email;
pub mod telegram;

pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

/// A chart written to disk, ready to attach or upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    /// Chart title; used as photo caption.
    pub title: String,
}

impl RenderedArtifact {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name, title: title.into() }
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

#[derive(Debug, Default)]
pub struct DeliveryBatch {
    items: Vec<RenderedArtifact>,
}

impl DeliveryBatch {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, artifact: RenderedArtifact) {
        self.items.push(artifact);
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedArtifact> {
        self.items.iter()
    }
}

impl IntoIterator for DeliveryBatch {
    type Item = RenderedArtifact;
    type IntoIter = std::vec::IntoIter<RenderedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeliveryBatch {
    type Item = &'a RenderedArtifact;
    type IntoIter = std::slice::Iter<'a, RenderedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("bad address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("invalid message part: {0}")]
    Build(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// One delivery channel.
pub trait Notifier {
    fn name(&self) -> &str;

    /// Plain text message. Used by the connectivity check.
    fn send_text(&self, text: &str) -> Result<(), DeliveryError>;

    /// Deliver every artifact of the batch. `subject` heads the message where the
    /// channel has one.
    fn deliver(&self, batch: DeliveryBatch, subject: &str) -> Result<(), DeliveryError>;
}

/// Dry run: logs instead of sending.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn name(&self) -> &str { "none" }

    fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        logf!("[dry run] text: {text}");
        Ok(())
    }

    fn deliver(&self, batch: DeliveryBatch, subject: &str) -> Result<(), DeliveryError> {
        logf!("[dry run] {subject}: {} chart(s)", batch.len());
        for a in &batch {
            logf!("[dry run]   {} ({})", a.title, a.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_file_name_from_path() {
        let a = RenderedArtifact::new("out/gdp (2).png", "GDP");
        assert_eq!(a.file_name, "gdp (2).png");
        assert_eq!(a.title, "GDP");
    }

    #[test]
    fn batch_keeps_push_order() {
        let mut b = DeliveryBatch::new();
        assert!(b.is_empty());
        b.push(RenderedArtifact::new("b.png", "B"));
        b.push(RenderedArtifact::new("a.png", "A"));
        let titles: Vec<_> = b.into_iter().map(|a| a.title).collect();
        assert_eq!(titles, ["B", "A"]);
    }

    #[test]
    fn null_notifier_accepts_anything() {
        let mut b = DeliveryBatch::new();
        b.push(RenderedArtifact::new("x.png", "X"));
        assert!(NullNotifier.deliver(b, "subject").is_ok());
        assert!(NullNotifier.send_text("hi").is_ok());
    }
}
