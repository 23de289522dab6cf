use gstconv::error::Result;
use gstconv::settings::{load_settings, save_settings, settings_path};

pub fn run(
    output_dir: Option<String>,
    default_name: Option<String>,
    select_all: Option<bool>,
) -> Result<()> {
    let mut settings = load_settings();
    let changed = output_dir.is_some() || default_name.is_some() || select_all.is_some();

    if let Some(dir) = output_dir {
        settings.output_dir = dir;
    }
    if let Some(name) = default_name {
        settings.default_output_name = name;
    }
    if let Some(all) = select_all {
        settings.select_all_months = all;
    }
    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Output dir:    {}", settings.output_dir);
    println!("Output name:   {}", settings.default_output_name);
    println!("Select all:    {}", settings.select_all_months);
    Ok(())
}
