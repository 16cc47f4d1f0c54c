use std::io;

use thiserror::Error;

use crate::*;

pub type AppResult<T> = Result<T, AppError>;

/// The kinds of errors that can occur during operations.
#[derive(Debug, Error)]
pub enum AppError {
	// I/O errors
	#[error("Could not create the dir `{path}`: {source}")]
	DirCreation { path: PathBuf, source: io::Error },

	#[error("Failed to create or write to the file `{path}`: {source}")]
	WriteError { path: PathBuf, source: io::Error },

	#[error("The file `{path}` already exists. Unset `no_overwrite` to replace existing files")]
	FileExists { path: PathBuf },

	#[error("Could not read the contents of `{path}`: {source}")]
	ReadError { path: PathBuf, source: io::Error },

	// Templating errors
	#[error("Failed to parse the template `{template}`: {source}")]
	TemplateParsing {
		template: String,
		source: ::tera::Error,
	},

	#[error("Failed to build the templating context for `{template}`: {source}")]
	TemplateContextParsing {
		template: String,
		source: ::tera::Error,
	},

	#[error("Failed to render the template `{template}`: {source}")]
	TemplateRendering {
		template: String,
		source: ::tera::Error,
	},

	// Invalid inputs
	#[error("Error while deserializing the contents of `{file}`: {error}")]
	DeserializationError { file: PathBuf, error: String },

	#[error(
		"The descriptor `{file}` did not pass strict validation:\n{}",
		format_warnings(warnings)
	)]
	Validation {
		file: PathBuf,
		warnings: Vec<ResolutionWarning>,
	},

	#[error("{0}")]
	Usage(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

fn format_warnings(warnings: &[ResolutionWarning]) -> String {
	warnings
		.iter()
		.map(|w| format!("  - {w}"))
		.collect::<Vec<_>>()
		.join("\n")
}
