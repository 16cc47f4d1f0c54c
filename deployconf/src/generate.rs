use crate::{
	compose::{compose_pipeline, compose_service, compose_workload},
	fs::deserialize_file,
	resolve::ResolvedDescriptor,
	templating::Renderer,
	*,
};

/// Loads a descriptor from a yaml, toml or json file.
pub fn load_descriptor(path: &Path) -> AppResult<ServiceDescriptor> {
	let descriptor: ServiceDescriptor = deserialize_file(path)?;

	debug!(
		"Loaded the descriptor `{}` with {} container(s) from `{}`",
		descriptor.name,
		descriptor.containers.len(),
		path.display()
	);

	Ok(descriptor)
}

/// Generates every artifact for a descriptor.
#[derive(Debug)]
pub struct Generator {
	settings: Settings,
	renderer: Renderer,
}

impl Generator {
	pub fn new(settings: Settings) -> AppResult<Self> {
		let renderer = Renderer::new(settings.templates_dir.as_deref())?;

		Ok(Self { settings, renderer })
	}

	pub const fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Runs the validation pass. Warnings are logged, and they are fatal in strict mode.
	pub fn check(&self, descriptor: &ServiceDescriptor, source: &Path) -> AppResult<Vec<ResolutionWarning>> {
		let warnings = validate(descriptor);

		for warning in &warnings {
			warn!("{}: {warning}", source.display());
		}

		if self.settings.strict && !warnings.is_empty() {
			return Err(AppError::Validation {
				file: source.to_path_buf(),
				warnings,
			});
		}

		Ok(warnings)
	}

	/// The path of an artifact for the given environment.
	pub fn artifact_path(&self, kind: ArtifactKind, environment: &str) -> PathBuf {
		match kind {
			ArtifactKind::Pipeline => self.settings.pipeline_path(),
			ArtifactKind::Service | ArtifactKind::Workload => self
				.settings
				.out_dir()
				.join(environment)
				.join(kind.file_name()),
		}
	}

	/// Renders every artifact that applies to a resolved descriptor, without writing anything.
	///
	/// The service manifest is only rendered when the descriptor has a service target, and the pipeline
	/// only when it is enabled.
	pub fn render(&self, resolved: &ResolvedDescriptor) -> Vec<(ArtifactKind, AppResult<String>)> {
		let mut rendered = Vec::new();

		if let Some(service) = compose_service(resolved) {
			rendered.push((
				ArtifactKind::Service,
				self.renderer.render(ArtifactKind::Service, &service),
			));
		} else {
			debug!("No service target for `{}`, skipping the service manifest", resolved.name);
		}

		rendered.push((
			ArtifactKind::Workload,
			self.renderer
				.render(ArtifactKind::Workload, &compose_workload(resolved)),
		));

		if !self.settings.no_pipeline {
			rendered.push((
				ArtifactKind::Pipeline,
				self.renderer
					.render(ArtifactKind::Pipeline, &compose_pipeline(resolved)),
			));
		}

		rendered
	}

	/// Resolves a descriptor and writes all of its artifacts.
	///
	/// Every artifact is attempted, and a failure for one of them does not prevent the others from being written.
	pub fn generate(&self, descriptor: &ServiceDescriptor, environment: &str) -> GenerationReport {
		let resolved = resolve(descriptor);
		let mut report = GenerationReport::default();

		for (kind, rendered) in self.render(&resolved) {
			let path = self.artifact_path(kind, environment);

			let result = rendered.and_then(|text| write_artifact(&path, &text, self.settings.can_overwrite()));

			report.push(kind, path, result);
		}

		report
	}
}
