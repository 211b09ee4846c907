//! Rendering abstraction for captured snapshots.

use crate::error::EnvError;
use crate::types::ScatterFrame;

/// Turns a snapshot into an image artifact.
///
/// Rendering is synchronous and fallible per frame: a failed frame is
/// logged and skipped by the caller, never retried.
pub trait FrameRenderer: Send + Sync {
    /// Renders one frame, replacing the previous artifact.
    fn render(&self, frame: &ScatterFrame) -> Result<(), EnvError>;

    /// Human-readable target (file path, window name, ...).
    fn target(&self) -> String;
}
