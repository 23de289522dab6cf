mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::convert::ConvertArgs;
use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let fallback = if verbose { "gstconv=debug" } else { "gstconv=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            zip,
            months,
            all_months,
            output,
            output_dir,
            format,
        } => cli::convert::run(ConvertArgs {
            zip,
            months,
            all_months,
            output,
            output_dir,
            format,
        }),
        Commands::Months { zip } => cli::months::run(&zip),
        Commands::Config {
            output_dir,
            default_name,
            select_all,
        } => cli::config::run(output_dir, default_name, select_all),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
