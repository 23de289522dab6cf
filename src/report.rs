use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{GstError, Result};
use crate::models::{Cell, Row, CATEGORY_COLUMN};
use crate::walker::Extraction;

/// Excel refuses worksheet names longer than this.
pub const SHEET_NAME_LIMIT: usize = 31;

pub fn sheet_name(category: &str) -> String {
    category.chars().take(SHEET_NAME_LIMIT).collect()
}

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

/// Rows of one category, without the `Category` column.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row, growing `columns` when the row brings a column the sheet
    /// has not seen. Earlier rows stay shorter and render blank there.
    fn push(&mut self, fields: Vec<(&'static str, Cell)>) {
        let mut line = vec![Cell::Null; self.columns.len()];
        for (column, value) in fields {
            if column == CATEGORY_COLUMN {
                continue;
            }
            match self.columns.iter().position(|c| *c == column) {
                Some(idx) => line[idx] = value,
                None => {
                    self.columns.push(column);
                    line.push(value);
                }
            }
        }
        self.rows.push(line);
    }

    /// Cell at (`row`, column named `column`), if present.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Excel compares sheet names case-insensitively. A name that clashes with
/// an existing sheet gets the first free numeric suffix (`B2B` -> `B2B1`),
/// trimming the base so the result stays within [`SHEET_NAME_LIMIT`].
fn unique_sheet_name(name: &str, sheets: &[Sheet]) -> String {
    let taken = |candidate: &str| {
        sheets
            .iter()
            .any(|s| s.name.to_lowercase() == candidate.to_lowercase())
    };
    if !taken(name) {
        return name.to_string();
    }
    let mut n = 1usize;
    loop {
        let suffix = n.to_string();
        let base: String = name
            .chars()
            .take(SHEET_NAME_LIMIT.saturating_sub(suffix.len()))
            .collect();
        let candidate = format!("{base}{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Keep rows whose month is selected and partition them by category, in the
/// order categories are first met. Categories that truncate to the same sheet
/// name share that sheet; names differing only in case get separate sheets.
pub fn assemble(rows: &[Row], selected_months: &BTreeSet<String>) -> Report {
    let mut report = Report::default();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for row in rows.iter().filter(|r| selected_months.contains(&r.month)) {
        let name = sheet_name(&row.category);
        let idx = match by_name.get(&name) {
            Some(idx) => *idx,
            None => {
                let unique = unique_sheet_name(&name, &report.sheets);
                report.sheets.push(Sheet::new(unique));
                let idx = report.sheets.len() - 1;
                by_name.insert(name, idx);
                idx
            }
        };
        report.sheets[idx].push(row.fields());
    }
    report
}

/// Assemble a report, turning the empty outcomes into distinct errors.
pub fn build_report(extraction: &Extraction, selected_months: &BTreeSet<String>) -> Result<Report> {
    if extraction.is_empty() {
        return Err(GstError::NoData);
    }
    if selected_months.is_empty() {
        return Err(GstError::NoMonthsSelected);
    }
    let report = assemble(&extraction.rows, selected_months);
    if report.is_empty() {
        let months: Vec<&str> = selected_months.iter().map(String::as_str).collect();
        return Err(GstError::NoRowsForSelection(months.join(", ")));
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Month summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSummary {
    pub month: String,
    pub category: String,
    pub rows: usize,
    pub taxable_value: f64,
    pub sgst: f64,
    pub cgst: f64,
    pub igst: f64,
    pub cess: f64,
}

/// Numeric value of a cell; numeric strings count, anything else is 0.
pub fn amount(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => n.as_f64().unwrap_or(0.0),
        Cell::String(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Row counts and tax totals per (month, category), sorted by both.
pub fn summarize(rows: &[Row]) -> Vec<MonthSummary> {
    let mut totals: BTreeMap<(&str, &str), MonthSummary> = BTreeMap::new();
    for row in rows {
        let entry = totals
            .entry((row.month.as_str(), row.category.as_str()))
            .or_insert_with(|| MonthSummary {
                month: row.month.clone(),
                category: row.category.clone(),
                ..Default::default()
            });
        let amounts = row.amounts();
        entry.rows += 1;
        entry.taxable_value += amount(&amounts.taxable_value);
        entry.sgst += amount(&amounts.sgst);
        entry.cgst += amount(&amounts.cgst);
        entry.igst += amount(&amounts.igst);
        entry.cess += amount(&amounts.cess);
    }
    totals.into_values().collect()
}
