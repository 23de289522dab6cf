use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::models::Cell;
use crate::report::Report;

// ---------------------------------------------------------------------------
// Export formats: enum dispatch, one writer per format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    /// One workbook, one worksheet per category.
    Xlsx,
    /// One CSV file per category.
    Csv,
}

impl ExportFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => ".xlsx",
            Self::Csv => ".csv",
        }
    }
}

const ALL_FORMATS: &[ExportFormat] = &[ExportFormat::Xlsx, ExportFormat::Csv];

pub fn get_by_key(key: &str) -> Option<ExportFormat> {
    ALL_FORMATS
        .iter()
        .find(|f| f.key().eq_ignore_ascii_case(key))
        .copied()
}

/// Strip a trailing export extension so `Report.xlsx` does not become `Report.xlsx.xlsx`.
pub fn output_stem(name: &str) -> &str {
    let name = name.trim();
    for format in ALL_FORMATS {
        let ext = format.extension();
        if name.len() > ext.len() && name.to_ascii_lowercase().ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}

/// Write `report` into `dir` under `name`. Returns the files written.
pub fn export(report: &Report, format: ExportFormat, dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let stem = output_stem(name);
    match format {
        ExportFormat::Xlsx => {
            let path = dir.join(format!("{stem}.xlsx"));
            write_xlsx(report, &path)?;
            Ok(vec![path])
        }
        ExportFormat::Csv => write_csv(report, dir, stem),
    }
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Null => {}
        Cell::String(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        Cell::Number(n) => {
            worksheet.write_number(row, col, n.as_f64().unwrap_or(0.0))?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

pub fn write_xlsx(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in &report.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        for (col, column) in sheet.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *column, &header)?;
        }
        for (idx, row) in sheet.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                write_cell(worksheet, idx as u32 + 1, col as u16, cell)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn csv_field(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

pub fn write_csv(report: &Report, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(report.sheets.len());
    for sheet in &report.sheets {
        let path = dir.join(format!("{stem}_{}.csv", file_safe(&sheet.name)));
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(&sheet.columns)?;
        for row in &sheet.rows {
            wtr.write_record(
                (0..sheet.columns.len()).map(|i| row.get(i).map(csv_field).unwrap_or_default()),
            )?;
        }
        wtr.flush()?;
        written.push(path);
    }
    Ok(written)
}
