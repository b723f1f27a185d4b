//! Trellis command-line compiler.
//!
//! Loads a KDL markup document, compiles it with the built-in kinds and
//! prints the resulting object graph as JSON.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use trellis_compiler::{DocumentCompiler, Environment, Namespace};
use trellis_markup::Document;
use url::Url;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(about = "Compile KDL markup into a JSON object graph")]
struct Args {
	/// Markup file to compile
	#[arg(value_name = "PATH")]
	path: PathBuf,

	/// Base locator for relative references (defaults to the markup's directory)
	#[arg(short, long, value_name = "URL")]
	base: Option<Url>,

	/// KDL config file with `base` and `symbols`
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// Print JSON on a single line
	#[arg(long)]
	compact: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();

	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => config::load_config(path).await?,
		None => config::Config::default(),
	};
	for warning in &config.warnings {
		tracing::warn!(%warning, "config.warning");
	}

	let namespace = Namespace::new();
	config.apply(&namespace);
	let env = Environment::default().with_namespace(Arc::new(namespace));

	let path = tokio::fs::canonicalize(&args.path).await?;
	let source = tokio::fs::read_to_string(&path).await?;
	let file_base = path.parent().and_then(|dir| Url::from_directory_path(dir).ok());
	let document = Document::parse_kdl(&source, file_base)?;
	info!(path = %path.display(), root = document.root().tag(), "cli.loaded");

	let base = args.base.or(config.base);
	let compiler = DocumentCompiler::new(&env, document, base).process().await?;

	let diagnostics = compiler.diagnostics();
	for diagnostic in &diagnostics {
		eprintln!(
			"warning: <{}> {}{}",
			diagnostic.tag,
			diagnostic.attribute.as_deref().map(|a| format!("[{a}] ")).unwrap_or_default(),
			diagnostic.error
		);
	}

	let result = compiler.result().unwrap_or_default();
	let json = if args.compact {
		serde_json::to_string(&result)?
	} else {
		serde_json::to_string_pretty(&result)?
	};
	println!("{json}");

	info!(diagnostics = diagnostics.len(), "cli.done");
	Ok(())
}
