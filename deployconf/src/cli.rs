
use std::{ffi::OsString, process::ExitCode};

use clap::Parser;

use crate::*;

/// Reports the outcome of every artifact and converts the run into an exit code.
pub fn main_entrypoint() -> ExitCode {
	match Cli::parse().execute() {
		Ok(report) => print_report(&report),
		Err(AppError::Usage(message)) => {
			println!("ERROR: {message}");
			ExitCode::FAILURE
		}
		Err(e) => {
			eprintln!("ERROR: {e}");
			ExitCode::FAILURE
		}
	}
}

fn print_report(report: &GenerationReport) -> ExitCode {
	for outcome in &report.outcomes {
		match &outcome.result {
			Ok(()) => println!("Created: {}", outcome.path.display()),
			Err(e) => eprintln!("ERROR: could not generate the {}: {e}", outcome.kind),
		}
	}

	if report.is_success() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

#[derive(Parser, Debug, Clone)]
#[command(name = "deployconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
	/// The descriptor file (yaml, toml or json) to generate the manifests from
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// The environment to configure. The manifests are written to a directory with this name
	#[arg(short, long, value_name = "NAME")]
	pub environment: Option<String>,

	/// Sets a custom settings file. Any file named `deployconf.{toml,yaml,yml,json}` in the cwd will be detected automatically
	#[arg(long, value_name = "FILE")]
	pub settings: Option<PathBuf>,

	#[command(flatten)]
	pub overrides: Settings,
}

impl Cli {
	/// Parses the arguments (including the binary name) and runs the generator.
	pub fn execute_with<I, T>(args: I) -> AppResult<GenerationReport>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		Self::try_parse_from(args)
			.map_err(|e| AppError::Usage(e.to_string()))?
			.execute()
	}

	pub fn execute(self) -> AppResult<GenerationReport> {
		let config = self.config.ok_or_else(|| {
			AppError::Usage("please specify a config file to parse via '--config'".to_string())
		})?;

		let environment = self
			.environment
			.filter(|environment| !environment.is_empty())
			.ok_or_else(|| AppError::Usage("please specify an environment".to_string()))?;

		let descriptor = load_descriptor(&config)?;

		let settings = self
			.overrides
			.with_fallback(Settings::discover(self.settings.as_deref())?);

		debug!("Settings: {settings:?}");

		let generator = Generator::new(settings)?;

		generator.check(&descriptor, &config)?;

		Ok(generator.generate(&descriptor, &environment))
	}
}
