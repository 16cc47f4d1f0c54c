use crate::{resolve::ResolvedDescriptor, *};

pub const PACKAGE_STAGE: &str = "package";

/// The deployment targets of the pipeline, in promotion order. The second field tells whether the job waits for a manual trigger.
pub const DEPLOY_TARGETS: [(&str, bool); 2] = [("staging", false), ("production", true)];

/// The content of the CI pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineDocument {
	pub stages: Vec<String>,
	/// Keyed by job name, one job per container.
	pub package_jobs: IndexMap<String, PackageJob>,
	pub deploy_jobs: Vec<DeployJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageJob {
	pub container: String,
	pub build_root: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployJob {
	pub job_name: String,
	pub stage: String,
	/// The directory holding the manifests generated for this environment.
	pub environment: String,
	pub deployment: String,
	pub manual: bool,
}

/// Composes the pipeline definition. Only the container names and build roots take part in it.
pub fn compose_pipeline(resolved: &ResolvedDescriptor) -> PipelineDocument {
	let mut package_jobs = IndexMap::new();

	for container in &resolved.containers {
		let job_name = format!("{}-{PACKAGE_STAGE}", container.name);

		if package_jobs.contains_key(&job_name) {
			warn!("Duplicate packaging job `{job_name}`, keeping the last definition");
		}

		package_jobs.insert(
			job_name,
			PackageJob {
				container: container.name.clone(),
				build_root: container.build_root.clone(),
			},
		);
	}

	let deploy_jobs = DEPLOY_TARGETS
		.iter()
		.map(|(environment, manual)| DeployJob {
			job_name: format!("{}-deploy-{environment}", resolved.name),
			stage: (*environment).to_string(),
			environment: (*environment).to_string(),
			deployment: resolved.name.clone(),
			manual: *manual,
		})
		.collect();

	let stages = std::iter::once(PACKAGE_STAGE)
		.chain(DEPLOY_TARGETS.iter().map(|(environment, _)| *environment))
		.map(str::to_string)
		.collect();

	PipelineDocument {
		stages,
		package_jobs,
		deploy_jobs,
	}
}
