//! Zip archive generator, one workbook per control cabinet

use super::workbook::WorkbookGenerator;
use super::{sorted_controllers, Cancellation, DeviceMap, OutputGenerator, PartialOutput};
use crate::domain::{Controller, OutputType, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip entry name of a cabinet's workbook
pub fn cabinet_entry_name(cabinet_id: &Uuid) -> String {
    format!("control-cabinet-{cabinet_id}.xlsx")
}

/// Writes a zip archive holding one workbook per control cabinet
///
/// Each cabinet workbook is rendered into a temporary file next to the
/// archive, copied into the zip and removed again, whether or not the copy
/// succeeded.
#[derive(Debug, Clone, Default)]
pub struct ZipArchiveGenerator {
    workbook: WorkbookGenerator,
}

impl ZipArchiveGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputGenerator for ZipArchiveGenerator {
    fn output_type(&self) -> OutputType {
        OutputType::Zip
    }

    fn generate(
        &self,
        path: &Path,
        controllers: &[Controller],
        devices: &DeviceMap,
        cancellation: &Cancellation,
    ) -> Result<()> {
        let scratch_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut groups: BTreeMap<Uuid, Vec<&Controller>> = BTreeMap::new();
        for controller in sorted_controllers(controllers) {
            groups.entry(controller.cabinet_id).or_default().push(controller);
        }

        let guard = PartialOutput::new(path);
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (cabinet_id, group) in &groups {
            cancellation.check()?;

            // Deleted when dropped, on every exit path
            let scratch = tempfile::Builder::new()
                .prefix(".ga-export-")
                .suffix(".xlsx")
                .tempfile_in(scratch_dir)?;
            self.workbook
                .write_workbook(scratch.path(), group, devices, cancellation)?;

            zip.start_file(cabinet_entry_name(cabinet_id), options)?;
            let mut reader = File::open(scratch.path())?;
            std::io::copy(&mut reader, &mut zip)?;

            tracing::debug!(
                cabinet_id = %cabinet_id,
                controllers = group.len(),
                "Cabinet workbook added to archive"
            );
        }

        zip.finish()?;
        guard.keep();

        tracing::debug!(
            path = %path.display(),
            cabinets = groups.len(),
            "Archive written"
        );
        Ok(())
    }
}
