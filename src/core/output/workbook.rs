//! Multi-sheet workbook generator

use super::naming::{sanitize_sheet_name, SheetNames};
use super::rows::{column_headings, device_rows, header_block, Cell, RowKind, HEADER_ROWS};
use super::{sorted_controllers, Cancellation, DeviceMap, OutputGenerator, PartialOutput};
use crate::domain::{Controller, OutputType, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Row index of the column headings (header block plus one blank row)
const HEADING_ROW: u32 = HEADER_ROWS as u32 + 1;

const PLACEHOLDER_SHEET: &str = "export";

/// Writes one workbook with a sheet per controller
#[derive(Debug, Clone, Default)]
pub struct WorkbookGenerator;

impl WorkbookGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render `controllers` into a workbook at `path`
    ///
    /// Used directly by the archive generator for per-cabinet workbooks; does
    /// not clean up after itself.
    pub(crate) fn write_workbook(
        &self,
        path: &Path,
        controllers: &[&Controller],
        devices: &DeviceMap,
        cancellation: &Cancellation,
    ) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let headings = column_headings();
        let mut names = SheetNames::new();

        for controller in controllers {
            cancellation.check()?;

            let name = names.assign(&sanitize_sheet_name(&controller.ga_device, &controller.id));
            let sheet = workbook.add_worksheet();
            sheet.set_name(&name)?;
            write_controller_sheet(sheet, controller, devices, &headings, &bold)?;
        }

        if controllers.is_empty() {
            let sheet = workbook.add_worksheet();
            sheet.set_name(PLACEHOLDER_SHEET)?;
            sheet.write_string(0, 0, "No controllers in scope")?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn write_controller_sheet(
    sheet: &mut Worksheet,
    controller: &Controller,
    devices: &DeviceMap,
    headings: &[String],
    bold: &Format,
) -> Result<()> {
    for (row, (key, value)) in header_block(controller).iter().enumerate() {
        sheet.write_string_with_format(row as u32, 0, *key, bold)?;
        sheet.write_string(row as u32, 1, value)?;
    }

    for (col, heading) in headings.iter().enumerate() {
        sheet.write_string_with_format(HEADING_ROW, col as u16, heading, bold)?;
    }
    sheet.set_freeze_panes(HEADING_ROW + 1, 0)?;

    let mut row = HEADING_ROW + 1;
    for device in devices.get(&controller.id).map(Vec::as_slice).unwrap_or_default() {
        for data in device_rows(controller, device) {
            for (col, cell) in data.cells.iter().enumerate() {
                let col = col as u16;
                match (cell, data.kind) {
                    (Cell::Empty, _) => {}
                    (Cell::Text(text), RowKind::Summary) if col == 0 => {
                        sheet.write_string_with_format(row, col, text, bold)?;
                    }
                    (Cell::Text(text), _) => {
                        sheet.write_string(row, col, text)?;
                    }
                    (Cell::Number(n), _) => {
                        sheet.write_number(row, col, *n)?;
                    }
                    (Cell::Bool(b), _) => {
                        sheet.write_boolean(row, col, *b)?;
                    }
                }
            }
            row += 1;
        }
    }
    Ok(())
}

impl OutputGenerator for WorkbookGenerator {
    fn output_type(&self) -> OutputType {
        OutputType::Excel
    }

    fn generate(
        &self,
        path: &Path,
        controllers: &[Controller],
        devices: &DeviceMap,
        cancellation: &Cancellation,
    ) -> Result<()> {
        let guard = PartialOutput::new(path);
        let sorted = sorted_controllers(controllers);
        self.write_workbook(path, &sorted, devices, cancellation)?;
        guard.keep();

        tracing::debug!(
            path = %path.display(),
            sheets = controllers.len(),
            "Workbook written"
        );
        Ok(())
    }
}
