use crate::{
	resolve::{Probe, ProbeKind, ResolvedContainer, ResolvedDescriptor, ResolvedEnvVar},
	*,
};

/// The content of the workload manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadDocument {
	pub name: String,
	pub replicas: String,
	pub local_service: bool,
	pub containers: Vec<WorkloadContainer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadContainer {
	pub name: String,
	pub image: String,
	pub env: Vec<ResolvedEnvVar>,
	pub port: Option<ContainerPort>,
	/// At most one probe per kind, liveness first.
	pub probes: Vec<Probe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerPort {
	pub container_port: i64,
	pub name: Option<String>,
	pub protocol: Option<String>,
}

pub fn compose_workload(resolved: &ResolvedDescriptor) -> WorkloadDocument {
	WorkloadDocument {
		name: resolved.name.clone(),
		replicas: resolved.replicas.clone(),
		local_service: resolved.local_service,
		containers: resolved
			.containers
			.iter()
			.map(compose_container)
			.collect(),
	}
}

fn compose_container(container: &ResolvedContainer) -> WorkloadContainer {
	WorkloadContainer {
		name: container.name.clone(),
		image: container.image.clone(),
		env: container.env.clone(),
		port: container.port.as_ref().map(|port| ContainerPort {
			container_port: port.number,
			name: port.name.clone(),
			protocol: port.protocol.clone(),
		}),
		probes: probe_slots(&container.probes),
	}
}

/// A container accepts a single probe of each kind, so later probes take the slot of earlier ones.
/// With the resolution order, an http liveness check replaces the default tcp one.
fn probe_slots(probes: &[Probe]) -> Vec<Probe> {
	let last_of = |kind: ProbeKind| probes.iter().rfind(|probe| probe.kind == kind).cloned();

	[ProbeKind::Liveness, ProbeKind::Readiness]
		.into_iter()
		.filter_map(last_of)
		.collect()
}
