use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::print_entry_errors;
use gstconv::error::Result;
use gstconv::fmt::inr;
use gstconv::report::summarize;
use gstconv::walker::walk_path;

pub fn run(zip: &str) -> Result<()> {
    let extraction = walk_path(&PathBuf::from(zip))?;
    print_entry_errors(&extraction.errors);

    if extraction.is_empty() {
        println!("{}", "No valid data found in uploaded ZIP.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Month", "Category", "Rows", "Taxable Value", "IGST", "CGST", "SGST", "CESS",
    ]);
    for s in summarize(&extraction.rows) {
        table.add_row(vec![
            Cell::new(&s.month),
            Cell::new(&s.category),
            Cell::new(s.rows),
            Cell::new(inr(s.taxable_value)),
            Cell::new(inr(s.igst)),
            Cell::new(inr(s.cgst)),
            Cell::new(inr(s.sgst)),
            Cell::new(inr(s.cess)),
        ]);
    }
    println!("Months\n{table}");

    let labels: Vec<&str> = extraction.months.iter().map(String::as_str).collect();
    println!(
        "{} entries read, {} skipped, {} failed. Months: {}",
        extraction.entries_read,
        extraction.entries_skipped,
        extraction.errors.len(),
        labels.join(", ").bold()
    );
    Ok(())
}
