//! Output generators
//!
//! Renders resolved controllers and their field devices into a downloadable
//! file:
//!
//! - [`workbook::WorkbookGenerator`] - one workbook, one sheet per controller
//! - [`archive::ZipArchiveGenerator`] - a zip with one workbook per control cabinet
//!
//! Generators are synchronous and run on the blocking pool. They check a
//! [`Cancellation`] between sheets and cabinet groups, and never leave a
//! partially written output file behind when they fail.

pub mod archive;
pub mod naming;
pub mod rows;
pub mod workbook;

pub use archive::ZipArchiveGenerator;
pub use workbook::WorkbookGenerator;

use crate::domain::{Controller, ExportError, FieldDevice, OutputType, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use uuid::Uuid;

/// Field devices collected per controller id
pub type DeviceMap = HashMap<Uuid, Vec<FieldDevice>>;

/// Renders an export file
pub trait OutputGenerator: Send + Sync {
    /// Kind of file this generator produces
    fn output_type(&self) -> OutputType;

    /// Write the export for `controllers` to `path`
    ///
    /// Controllers without an entry in `devices` get an empty sheet.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Cancelled`] if `cancellation` fires, or
    /// [`ExportError::Generation`] / [`ExportError::Io`] on encoding or file
    /// system failures. In every error case `path` does not exist afterwards.
    fn generate(
        &self,
        path: &Path,
        controllers: &[Controller],
        devices: &DeviceMap,
        cancellation: &Cancellation,
    ) -> Result<()>;
}

/// Cooperative cancellation signal for generators
///
/// Follows one or more shutdown watch channels; a `true` value on any of
/// them means stop.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    signals: Vec<watch::Receiver<bool>>,
}

impl Cancellation {
    /// Follow a watch channel
    pub fn new(signal: watch::Receiver<bool>) -> Self {
        Self {
            signals: vec![signal],
        }
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self::default()
    }

    /// Fires once either `self` or `other` fires
    pub fn or(mut self, other: Cancellation) -> Self {
        self.signals.extend(other.signals);
        self
    }

    /// Returns true once cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.signals.iter().any(|rx| *rx.borrow())
    }

    /// Returns [`ExportError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ExportError::Cancelled(
                "cancellation requested during file generation".to_string(),
            ));
        }
        Ok(())
    }
}

/// Controllers in output order: by cabinet, then GA-device label
pub fn sorted_controllers(controllers: &[Controller]) -> Vec<&Controller> {
    let mut sorted: Vec<&Controller> = controllers.iter().collect();
    sorted.sort_by(|a, b| {
        a.cabinet_id
            .cmp(&b.cabinet_id)
            .then_with(|| a.ga_device.cmp(&b.ga_device))
            .then_with(|| a.min_system_part_nr.cmp(&b.min_system_part_nr))
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Removes an output file on drop unless it was kept
pub(crate) struct PartialOutput {
    path: PathBuf,
    keep: bool,
}

impl PartialOutput {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            keep: false,
        }
    }

    /// The output is complete; leave it on disk
    pub(crate) fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed partial output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial output"
            ),
        }
    }
}
