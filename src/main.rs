use clap::Parser;
use findspot_calib::{load_config, run, RuntimeConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "findspot-calib")]
#[command(about = "Place geographic finds onto map raster pixels")]
struct Cli {
    /// Find records to convert (overrides `finds` from the config)
    finds: Option<PathBuf>,

    /// JSON runtime config; defaults apply relative to the working directory
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write the run report JSON here (overrides `output.report_json`)
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run_cli(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), findspot_calib::CalibError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(finds) = cli.finds {
        config.finds = finds;
    }
    if let Some(report) = cli.report {
        config.output.report_json = Some(report);
    }

    let report = run(&config)?;
    report.print_text_summary();
    println!(
        "Wrote {} points to {}",
        report.counts.placed,
        config.output.points_json.display()
    );
    Ok(())
}
