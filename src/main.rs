use std::path::PathBuf;

use ankify::{config::Config, confirm::{AutoConfirm, TerminalConfirm}, convert_file, importer::run_import, print_conversion_summary};
use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ankify", about = "Convert study notes into Anki notes", version)]
struct Cli {
	/// Study-note file to convert
	input: PathBuf,

	/// Deck to import into, overriding the file's `# deck:` line
	#[arg(short, long)]
	deck: Option<String>,

	/// Config file (default: ./ankify.toml if present)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Continue past every warning without asking
	#[arg(short, long)]
	yes: bool,

	/// Only convert; do not run the import command
	#[arg(long)]
	no_import: bool,
}

fn main() -> Result<()> {
	color_eyre::install()?;

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let cli = Cli::parse();
	let config = Config::discover(cli.config.as_deref()).wrap_err("Failed to load configuration")?;

	let output = config.output_path(&cli.input);
	let source_name = cli.input.display().to_string();

	let result = if cli.yes || config.assume_yes {
		convert_file(&cli.input, &output, AutoConfirm)
	} else {
		convert_file(&cli.input, &output, TerminalConfirm::new(source_name))
	};
	let conversion = result.wrap_err_with(|| format!("Failed to convert {}", cli.input.display()))?;

	print_conversion_summary(&conversion);
	println!("Conversion complete. Output file: {}", output.display());

	if cli.no_import || !config.import.enabled {
		info!("Import disabled; leaving {}", output.display());
		return Ok(());
	}

	let deck = cli.deck.or(config.default_deck.clone()).unwrap_or(conversion.deck);
	let import_output = run_import(&config.import, &output, &deck)
		.wrap_err_with(|| format!("Failed to import {}", output.display()))?;

	println!("{}", import_output);
	Ok(())
}
