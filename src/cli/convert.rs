use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use dialoguer::MultiSelect;
use tracing::info;

use crate::cli::print_entry_errors;
use gstconv::error::{GstError, Result};
use gstconv::report::build_report;
use gstconv::settings::{expand_path, load_settings, Settings};
use gstconv::walker::walk_path;
use gstconv::writer::{export, get_by_key};

pub struct ConvertArgs {
    pub zip: String,
    pub months: Vec<String>,
    pub all_months: bool,
    pub output: Option<String>,
    pub output_dir: Option<String>,
    pub format: String,
}

/// Decide which months go into the report: flags first, then the picker when
/// attached to a terminal. Anything else selects nothing.
fn resolve_months(
    discovered: &BTreeSet<String>,
    requested: &[String],
    all_months: bool,
    settings: &Settings,
    interactive: bool,
) -> Result<BTreeSet<String>> {
    if all_months {
        return Ok(discovered.clone());
    }
    let requested: BTreeSet<String> = requested
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if !requested.is_empty() || !interactive || discovered.is_empty() {
        return Ok(requested);
    }

    let items: Vec<&String> = discovered.iter().collect();
    let defaults = vec![settings.select_all_months; items.len()];
    let picked = MultiSelect::new()
        .with_prompt("Select month(s) to include")
        .items(&items)
        .defaults(&defaults)
        .interact()?;
    Ok(picked.into_iter().map(|i| items[i].clone()).collect())
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let settings = load_settings();
    let format = get_by_key(&args.format).ok_or_else(|| GstError::UnknownFormat(args.format.clone()))?;

    let extraction = walk_path(&PathBuf::from(&args.zip))?;
    print_entry_errors(&extraction.errors);
    if extraction.is_empty() {
        return Err(GstError::NoData);
    }

    let interactive = std::io::stdin().is_terminal();
    let selected = resolve_months(
        &extraction.months,
        &args.months,
        args.all_months,
        &settings,
        interactive,
    )?;

    let start = Instant::now();
    let report = build_report(&extraction, &selected)?;
    let dir = expand_path(args.output_dir.as_deref().unwrap_or(&settings.output_dir));
    let name = args.output.unwrap_or_else(|| settings.default_output_name.clone());
    let written = export(&report, format, &dir, &name)?;
    let elapsed = start.elapsed().as_secs_f64();

    info!(rows = report.row_count(), sheets = report.sheets.len(), "report written");
    println!(
        "{}",
        format!(
            "{} rows across {} categor{} generated in {elapsed:.2} seconds.",
            report.row_count(),
            report.sheets.len(),
            if report.sheets.len() == 1 { "y" } else { "ies" }
        )
        .green()
    );
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
