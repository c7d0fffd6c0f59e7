//! This module contains the main entrypoint to the rice cli.

use clap::Parser;
use colored::Colorize;
use rice_app::{Dashboard, Tab, TabState};
use rice_client::{Client, ModelName, ProjectionMethod};
use rice_util::{err, error::Result};
use std::path::PathBuf;

mod config;
mod render;

/// The number of projected points printed below the class distribution.
const PROJECTION_POINTS: usize = 10;

#[derive(Parser)]
#[clap(
	name = "rice",
	about = "Classify rice grains and inspect the models of a rice classification service."
)]
struct Options {
	#[clap(
		long,
		global = true,
		env = "RICE_API_URL",
		help = "the base url of the classification service"
	)]
	url: Option<String>,
	#[clap(
		long,
		global = true,
		value_name = "SECONDS",
		help = "give up on requests that take longer than this"
	)]
	timeout: Option<u64>,
	#[clap(long, global = true, help = "the path to a json config file")]
	config: Option<PathBuf>,
	#[clap(short, long, global = true, help = "log debug events to stderr")]
	verbose: bool,
	#[clap(subcommand)]
	command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
	#[clap(about = "list the features a prediction takes")]
	Features,
	#[clap(about = "predict the rice variety of one grain")]
	Predict(PredictOptions),
	#[clap(about = "show the 2d projection of the dataset")]
	Projection(ProjectionOptions),
	#[clap(about = "show the evaluation metrics of a model")]
	Metrics(MetricsOptions),
}

#[derive(clap::Args)]
struct PredictOptions {
	#[clap(long, help = "fill every feature with a random value in [0, 1)")]
	random: bool,
	#[clap(
		long = "set",
		value_name = "NAME=VALUE",
		parse(try_from_str = parse_assignment),
		help = "set one feature, applied after --random"
	)]
	assignments: Vec<(String, String)>,
	#[clap(long, help = "predict with only this model: knn, svm or nb")]
	model: Option<ModelName>,
}

#[derive(clap::Args)]
struct ProjectionOptions {
	#[clap(long, default_value = "pca", help = "the projection method: pca or tsne")]
	method: ProjectionMethod,
}

#[derive(clap::Args)]
struct MetricsOptions {
	#[clap(long, default_value = "knn", help = "the model: knn, svm or nb")]
	model: ModelName,
}

fn main() {
	let options = Options::parse();
	rice_util::log::init(if options.verbose { "debug" } else { "info" });
	if let Err(error) = run(options) {
		eprintln!("{}: {}", "error".red().bold(), error);
		for cause in error.chain().skip(1) {
			eprintln!("  {} {}", "->".red(), cause);
		}
		std::process::exit(1);
	}
}

fn run(options: Options) -> Result<()> {
	let config = match options.config.as_deref() {
		Some(path) => config::Config::from_path(path)?,
		None => config::Config::default(),
	};
	let client_options = config::client_options(config, options.url, options.timeout)?;
	tracing::debug!(base_url = %client_options.base_url, "using classification service");
	let dashboard = Dashboard::new(Client::new(client_options)?);
	let runtime = tokio::runtime::Runtime::new()?;
	match options.command {
		Command::Features => {
			print!("{}", render::feature_groups(dashboard.predict.groups()));
			Ok(())
		}
		Command::Predict(options) => runtime.block_on(cli_predict(&dashboard, options)),
		Command::Projection(options) => runtime.block_on(cli_projection(&dashboard, options)),
		Command::Metrics(options) => runtime.block_on(cli_metrics(&dashboard, options)),
	}
}

async fn cli_predict(dashboard: &Dashboard, options: PredictOptions) -> Result<()> {
	dashboard.select(Tab::Prediction);
	let tab = &dashboard.predict;
	if options.random {
		tab.randomize();
	}
	for (name, text) in options.assignments.iter() {
		tab.set(name, text)?;
	}
	if options.random || !options.assignments.is_empty() {
		eprint!("{}", render::feature_values(&tab.features()));
	}
	match options.model {
		Some(model_name) => tab.submit_model(model_name).await,
		None => tab.submit().await,
	};
	let prediction = into_result(tab.state())?;
	print!("{}", render::prediction(&prediction));
	Ok(())
}

async fn cli_projection(dashboard: &Dashboard, options: ProjectionOptions) -> Result<()> {
	dashboard.select(Tab::Projection);
	dashboard.projection.fetch_method(options.method).await;
	let projection = into_result(dashboard.projection.state())?;
	print!("{}", render::projection(&projection, PROJECTION_POINTS));
	Ok(())
}

async fn cli_metrics(dashboard: &Dashboard, options: MetricsOptions) -> Result<()> {
	dashboard.select(Tab::Metrics);
	dashboard.metrics.fetch_model(options.model).await;
	let report = into_result(dashboard.metrics.state())?;
	print!("{}", render::metrics(&report));
	Ok(())
}

/// A finished tab holds either the value to print or the message to fail with.
fn into_result<T>(state: TabState<T>) -> Result<T> {
	match state {
		TabState::Success(value) => Ok(value),
		TabState::Failure { message, .. } => Err(err!("{}", message)),
		TabState::Idle | TabState::Loading { .. } => Err(err!("the request did not finish")),
	}
}

fn parse_assignment(assignment: &str) -> Result<(String, String), String> {
	match assignment.split_once('=') {
		Some((name, value)) if !name.trim().is_empty() => {
			Ok((name.trim().to_owned(), value.to_owned()))
		}
		_ => Err(format!("expected NAME=VALUE, got {:?}", assignment)),
	}
}

#[test]
fn test_parse_assignment() {
	assert_eq!(
		parse_assignment("AREA=1.5").unwrap(),
		("AREA".to_owned(), "1.5".to_owned())
	);
	assert_eq!(
		parse_assignment(" AREA =").unwrap(),
		("AREA".to_owned(), "".to_owned())
	);
	assert!(parse_assignment("AREA").is_err());
	assert!(parse_assignment("=1.5").is_err());
}

#[test]
fn test_options() {
	let options = Options::try_parse_from(vec![
		"rice",
		"predict",
		"--random",
		"--set",
		"AREA=2",
		"--set",
		"EXTENT=0.5",
		"--model",
		"svm",
		"--timeout",
		"3",
	])
	.unwrap();
	assert_eq!(options.timeout, Some(3));
	match options.command {
		Command::Predict(predict) => {
			assert!(predict.random);
			assert_eq!(predict.assignments.len(), 2);
			assert_eq!(predict.model, Some(ModelName::Svm));
		}
		_ => panic!("expected the predict command"),
	}
	let options = Options::try_parse_from(vec!["rice", "metrics"]).unwrap();
	match options.command {
		Command::Metrics(metrics) => assert_eq!(metrics.model, ModelName::Knn),
		_ => panic!("expected the metrics command"),
	}
	assert!(Options::try_parse_from(vec!["rice", "metrics", "--model", "lr"]).is_err());
}
