use std::sync::LazyLock;

use regex::Regex;

use crate::{fs::*, *};

/// The kinds of artifacts generated for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
	Service,
	Workload,
	Pipeline,
}

impl ArtifactKind {
	/// All kinds, in generation order.
	pub const ALL: [Self; 3] = [Self::Service, Self::Workload, Self::Pipeline];

	pub const fn template_name(self) -> &'static str {
		match self {
			Self::Service => "service.yaml.tera",
			Self::Workload => "deployment.yaml.tera",
			Self::Pipeline => "gitlab-ci.yml.tera",
		}
	}

	pub(crate) const fn builtin_template(self) -> &'static str {
		match self {
			Self::Service => include_str!("templates/service.yaml.tera"),
			Self::Workload => include_str!("templates/deployment.yaml.tera"),
			Self::Pipeline => include_str!("templates/gitlab-ci.yml.tera"),
		}
	}

	/// The name of the generated file. Manifests are prefixed so that services are applied before workloads.
	pub const fn file_name(self) -> &'static str {
		match self {
			Self::Service => "01-service.yaml",
			Self::Workload => "02-deployment.yaml",
			Self::Pipeline => ".gitlab-ci.yml",
		}
	}
}

impl Display for ArtifactKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Service => write!(f, "service manifest"),
			Self::Workload => write!(f, "workload manifest"),
			Self::Pipeline => write!(f, "CI pipeline"),
		}
	}
}

static BLANK_LINES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^[ \t\r]*(?:\n|\z)").expect("Invalid blank lines pattern"));

/// Removes the whitespace-only lines left behind by untaken template branches, trims the leading and
/// trailing line breaks and terminates the text with a single newline.
pub fn normalize(text: &str) -> String {
	let stripped = BLANK_LINES.replace_all(text, "");

	format!("{}\n", stripped.trim_matches(['\r', '\n']))
}

/// Writes the normalized text of an artifact, creating the parent directories if needed.
pub fn write_artifact(path: &Path, rendered: &str, overwrite: bool) -> AppResult<()> {
	create_parent_dirs(path)?;

	write_file(path, &normalize(rendered), overwrite)
}

/// The result of generating a single artifact.
#[derive(Debug)]
pub struct ArtifactOutcome {
	pub kind: ArtifactKind,
	pub path: PathBuf,
	pub result: AppResult<()>,
}

impl ArtifactOutcome {
	pub const fn is_success(&self) -> bool {
		self.result.is_ok()
	}
}

/// The outcomes of every artifact attempted in a run.
#[derive(Debug, Default)]
pub struct GenerationReport {
	pub outcomes: Vec<ArtifactOutcome>,
}

impl GenerationReport {
	pub fn push(&mut self, kind: ArtifactKind, path: PathBuf, result: AppResult<()>) {
		match &result {
			Ok(()) => info!("Generated the {kind} at `{}`", path.display()),
			Err(e) => warn!("Failed to generate the {kind} at `{}`: {e}", path.display()),
		};

		self.outcomes.push(ArtifactOutcome { kind, path, result });
	}

	pub fn is_success(&self) -> bool {
		self.outcomes.iter().all(ArtifactOutcome::is_success)
	}

	pub fn outcome(&self, kind: ArtifactKind) -> Option<&ArtifactOutcome> {
		self.outcomes.iter().find(|o| o.kind == kind)
	}

	pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
		self.outcomes.iter().filter(|o| !o.is_success())
	}
}
