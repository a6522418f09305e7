use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use zonedit::app::{FileApp, prompt_file_names};
use zonedit::config::EditorConfig;
use zonedit::logging;

/// Line editor that works on a bounded window of a large text file.
#[derive(Debug, Parser)]
#[command(name = "zonedit", version, about)]
struct Args {
	/// File to edit. Omit to start a new document.
	input:      Option<PathBuf>,
	/// File that receives the edited document.
	output:     Option<PathBuf>,
	/// TOML config file.
	#[arg(short, long)]
	config:     Option<PathBuf>,
	/// Most lines held in the zone at once.
	#[arg(long)]
	max_lines:  Option<usize>,
	/// Lines per printed page.
	#[arg(long)]
	page_size:  Option<usize>,
	/// Lines loaded from the input per zone.
	#[arg(long)]
	load_batch: Option<usize>,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let args = Args::parse();
	let config = load_config(&args)?;
	logging::init_logging(&config.log_level).context("initialize logging failed")?;

	let mut reader = io::stdin().lock();
	let mut writer = io::stdout().lock();

	let (input, output) = if args.input.is_none() && args.output.is_none() {
		prompt_file_names(&mut reader, &mut writer).context("read file names failed")?
	} else {
		(args.input, args.output)
	};

	let app = FileApp::open(config, input.as_deref(), output.as_deref()).context("open session failed")?;
	app.run(reader, writer).context("run editor failed")?;
	Ok(())
}

fn load_config(args: &Args) -> Result<EditorConfig> {
	let mut config = match &args.config {
		Some(path) => EditorConfig::load(path).context("load config failed")?,
		None => EditorConfig::default(),
	};
	if let Some(max_lines) = args.max_lines {
		config.max_lines = max_lines;
	}
	if let Some(page_size) = args.page_size {
		config.page_size = page_size;
	}
	if let Some(load_batch) = args.load_batch {
		config.load_batch = load_batch;
	}
	config.validate().context("invalid settings")?;
	Ok(config)
}
