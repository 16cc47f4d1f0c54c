use std::ops::RangeInclusive;

use thiserror::Error;

use crate::{
	resolve::{ServiceTarget, resolve_replicas},
	*,
};

/// The transport protocol tokens accepted by the orchestration platform.
pub const KNOWN_PROTOCOLS: [&str; 3] = ["TCP", "UDP", "SCTP"];

/// The range of valid network port numbers.
pub const PORT_RANGE: RangeInclusive<i64> = 1..=65535;

/// An input that is accepted by the resolution rules, but that produces a degenerate manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionWarning {
	#[error("the descriptor has no name")]
	MissingServiceName,

	#[error("the descriptor has no containers")]
	NoContainers,

	#[error("the container at position {index} has no name")]
	MissingContainerName { index: usize },

	#[error("the container name `{name}` is used more than once")]
	DuplicateContainer { name: String },

	#[error("replicas `{value}` is not a non-negative integer")]
	InvalidReplicas { value: String },

	#[error("replicas `{value}` is ignored, local services always run a single replica")]
	IgnoredReplicas { value: String },

	#[error("serviceTarget `{target}` does not match any container")]
	UnknownServiceTarget { target: String },

	#[error("container `{container}` has no port and is left out of the service")]
	PortlessServiceContainer { container: String },

	#[error("container `{container}` uses the port `{port}`, which is not a valid port number")]
	InvalidPort { container: String, port: i64 },

	#[error("container `{container}` has a port but no protocol")]
	MissingProtocol { container: String },

	#[error("container `{container}` uses the unknown protocol `{protocol}`")]
	UnknownProtocol { container: String, protocol: String },

	#[error("container `{container}` requests an http check but has no port")]
	HttpCheckWithoutPort { container: String },

	#[error("container `{container}` defines the env variable `{variable}` more than once")]
	DuplicateEnvVar { container: String, variable: String },
}

/// Collects every warning for a descriptor. Never fails, the caller decides whether warnings are fatal.
pub fn validate(descriptor: &ServiceDescriptor) -> Vec<ResolutionWarning> {
	let mut warnings = Vec::new();

	if descriptor.name.is_empty() {
		warnings.push(ResolutionWarning::MissingServiceName);
	}

	if descriptor.containers.is_empty() {
		warnings.push(ResolutionWarning::NoContainers);
	}

	if descriptor.is_local_service() {
		if let Some(value) = descriptor.replicas_text() {
			warnings.push(ResolutionWarning::IgnoredReplicas { value });
		}
	} else {
		let replicas = resolve_replicas(descriptor);

		if replicas.parse::<u32>().is_err() {
			warnings.push(ResolutionWarning::InvalidReplicas { value: replicas });
		}
	}

	let mut seen_names: IndexSet<&str> = IndexSet::new();

	for (index, container) in descriptor.containers.iter().enumerate() {
		if container.name.is_empty() {
			warnings.push(ResolutionWarning::MissingContainerName { index });
		} else if !seen_names.insert(&container.name) {
			warnings.push(ResolutionWarning::DuplicateContainer {
				name: container.name.clone(),
			});
		}

		check_container(container, &mut warnings);
	}

	if let Some(target) = descriptor.service_target_text() {
		check_service_target(descriptor, &ServiceTarget::from_text(&target), &mut warnings);
	}

	warnings
}

fn check_container(container: &ContainerSpec, warnings: &mut Vec<ResolutionWarning>) {
	let name = &container.name;

	if container.has_port() {
		if !PORT_RANGE.contains(&container.port_number) {
			warnings.push(ResolutionWarning::InvalidPort {
				container: name.clone(),
				port: container.port_number,
			});
		}

		if container.protocol.is_empty() {
			warnings.push(ResolutionWarning::MissingProtocol {
				container: name.clone(),
			});
		} else if !KNOWN_PROTOCOLS.contains(&container.protocol.as_str()) {
			warnings.push(ResolutionWarning::UnknownProtocol {
				container: name.clone(),
				protocol: container.protocol.clone(),
			});
		}
	} else if container.probes.iter().any(|p| p.http_check) {
		warnings.push(ResolutionWarning::HttpCheckWithoutPort {
			container: name.clone(),
		});
	}

	let mut seen_vars: IndexSet<&str> = IndexSet::new();

	for var in &container.env {
		if !seen_vars.insert(&var.name) {
			warnings.push(ResolutionWarning::DuplicateEnvVar {
				container: name.clone(),
				variable: var.name.clone(),
			});
		}
	}
}

fn check_service_target(
	descriptor: &ServiceDescriptor,
	target: &ServiceTarget,
	warnings: &mut Vec<ResolutionWarning>,
) {
	let selected: Vec<&ContainerSpec> = descriptor
		.containers
		.iter()
		.filter(|c| target.selects(&c.name))
		.collect();

	if let ServiceTarget::Container(name) = target
		&& selected.is_empty()
	{
		warnings.push(ResolutionWarning::UnknownServiceTarget {
			target: name.clone(),
		});
	}

	for container in selected {
		if !container.has_port() {
			warnings.push(ResolutionWarning::PortlessServiceContainer {
				container: container.name.clone(),
			});
		}
	}
}
