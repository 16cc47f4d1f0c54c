use std::fs::exists;

use clap::Args;
use merge::Merge;

use crate::{fs::deserialize_file, *};

/// The names of the settings files that are detected automatically in the working directory.
pub const SETTINGS_FILE_NAMES: [&str; 4] = [
	"deployconf.toml",
	"deployconf.yaml",
	"deployconf.yml",
	"deployconf.json",
];

/// The default location of the CI pipeline definition, relative to the output directory.
pub const DEFAULT_PIPELINE_FILE: &str = ".gitlab-ci.yml";

/// The settings of the generator. They can be set in a settings file or via the cli, which takes precedence.
#[allow(clippy::struct_excessive_bools)]
#[derive(Args, Clone, Debug, Deserialize, Serialize, Merge, PartialEq, Eq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
	/// The root directory for the generated files [default: the current directory]
	#[arg(long, value_name = "DIR")]
	#[merge(strategy = merge::option::overwrite_none)]
	pub out_dir: Option<PathBuf>,

	/// A directory with templates that replace the built-in ones (`deployment.yaml.tera`, `service.yaml.tera`, `gitlab-ci.yml.tera`)
	#[arg(long, value_name = "DIR")]
	#[merge(strategy = merge::option::overwrite_none)]
	pub templates_dir: Option<PathBuf>,

	/// The path of the CI pipeline definition [default: `.gitlab-ci.yml` in the output directory]
	#[arg(long, value_name = "FILE")]
	#[merge(strategy = merge::option::overwrite_none)]
	pub pipeline_path: Option<PathBuf>,

	/// Do not generate the CI pipeline definition.
	#[arg(long)]
	#[merge(strategy = merge::bool::overwrite_false)]
	pub no_pipeline: bool,

	/// Do not overwrite existing files.
	#[arg(long)]
	#[merge(strategy = merge::bool::overwrite_false)]
	pub no_overwrite: bool,

	/// Abort if the descriptor produces any resolution warning.
	#[arg(long)]
	#[merge(strategy = merge::bool::overwrite_false)]
	pub strict: bool,
}

impl Settings {
	/// Extracts the settings from a yaml, toml or json file.
	///
	/// Relative paths are resolved from the directory of the settings file.
	pub fn from_file(path: &Path) -> AppResult<Self> {
		let mut settings: Self = deserialize_file(path)?;

		let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

		for setting in [
			&mut settings.out_dir,
			&mut settings.templates_dir,
			&mut settings.pipeline_path,
		] {
			if let Some(rel_path) = setting.as_mut()
				&& rel_path.is_relative()
			{
				*rel_path = base_dir.join(&*rel_path);
			}
		}

		debug!("Loaded the settings from `{}`", path.display());

		Ok(settings)
	}

	/// Loads the settings file from the given path or, if missing, from the settings files detected in the working directory.
	pub fn discover(explicit_file: Option<&Path>) -> AppResult<Option<Self>> {
		if let Some(file) = explicit_file {
			return Self::from_file(file).map(Some);
		}

		SETTINGS_FILE_NAMES
			.into_iter()
			.map(Path::new)
			.find(|path| exists(path).is_ok_and(|exists| exists))
			.map(Self::from_file)
			.transpose()
	}

	/// Overlays these settings on top of the values coming from a settings file.
	#[must_use]
	pub fn with_fallback(mut self, fallback: Option<Self>) -> Self {
		if let Some(fallback) = fallback {
			self.merge(fallback);
		}

		self
	}

	pub fn out_dir(&self) -> PathBuf {
		self.out_dir.clone().unwrap_or_default()
	}

	pub fn pipeline_path(&self) -> PathBuf {
		self.pipeline_path
			.clone()
			.unwrap_or_else(|| self.out_dir().join(DEFAULT_PIPELINE_FILE))
	}

	pub const fn can_overwrite(&self) -> bool {
		!self.no_overwrite
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn cli_values_take_precedence() {
		let cli = Settings {
			out_dir: Some("from-cli".into()),
			strict: true,
			..Default::default()
		};

		let file = Settings {
			out_dir: Some("from-file".into()),
			templates_dir: Some("templates".into()),
			no_overwrite: true,
			..Default::default()
		};

		let merged = cli.with_fallback(Some(file));

		assert_eq!(
			merged,
			Settings {
				out_dir: Some("from-cli".into()),
				templates_dir: Some("templates".into()),
				pipeline_path: None,
				no_pipeline: false,
				no_overwrite: true,
				strict: true,
			}
		);
	}

	#[test]
	fn default_paths() {
		let settings = Settings::default();

		assert_eq!(settings.out_dir(), PathBuf::new());
		assert_eq!(settings.pipeline_path(), PathBuf::from(".gitlab-ci.yml"));
		assert!(settings.can_overwrite());

		let settings = Settings {
			out_dir: Some("deploy".into()),
			..Default::default()
		};

		assert_eq!(
			settings.pipeline_path(),
			PathBuf::from("deploy/.gitlab-ci.yml")
		);
	}
}
