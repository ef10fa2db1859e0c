//! exportar CLI entry point.

use clap::error::ErrorKind;
use clap::Parser;
use exportar::cli::{styles, CommonArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "exportar")]
#[command(about = "Convert a trained detection checkpoint into a servable export bundle")]
#[command(version)]
struct Cli {
    /// Path to the trained checkpoint file
    model: PathBuf,

    /// Output folder for the export bundle
    output: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("Wrong arguments");
            println!("Usage: exportar <checkpoint_file_path> <output_folder_path>");
            std::process::exit(1);
        }
    };

    let config = cli.common.to_cli();

    match exportar::export(&cli.model, &cli.output) {
        Ok(report) => {
            if !config.is_quiet() {
                println!("{}", styles::success("Export complete"));
                println!("  Bundle: {}", report.bundle_path.display());
                println!(
                    "  Signature: {} input(s), {} output(s)",
                    report.signature_inputs, report.signature_outputs
                );
                println!("  Variables: {}", report.variable_count);
                if config.is_verbose() {
                    println!("  Duration: {:.2}s", report.duration_seconds);
                }
            }
        }
        Err(e) => {
            if !config.is_quiet() {
                eprintln!("{}", styles::error(&format!("[{}] {e}", e.code())));
            }
            std::process::exit(1);
        }
    }
}
