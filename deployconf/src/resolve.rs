//! Resolution of a [`ServiceDescriptor`] into the effective values used by every manifest.
//!
//! Precedence is always the same: local-service overrides win over explicit values, and explicit values
//! win over the built-in defaults. Resolution never fails. Incomplete descriptors fall through to
//! defaults, and the [`validation`](crate::validation) pass is the place to report them. Every function
//! here is pure and does not log.

use deploy_descriptor::EnvVar;

use crate::*;

/// The image used for containers that do not specify one.
pub const FALLBACK_IMAGE: &str = "alpine";

/// The replica count used when the descriptor does not specify one.
pub const DEFAULT_REPLICAS: &str = "2";

/// The replica count enforced for local services.
pub const LOCAL_REPLICAS: &str = "1";

/// The service type used to expose local services outside of the cluster network.
pub const NODE_PORT_SERVICE_TYPE: &str = "NodePort";

/// The `serviceTarget` value that exposes every container.
pub const ALL_CONTAINERS_TARGET: &str = "true";

/// A descriptor with all of its defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDescriptor {
	pub name: String,
	pub hostname: Option<String>,
	pub local_service: bool,
	/// Kept as text, it is echoed verbatim into the workload manifest.
	pub replicas: String,
	pub containers: Vec<ResolvedContainer>,
	/// `None` when no service manifest should be generated.
	pub service: Option<ResolvedService>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContainer {
	pub name: String,
	pub image: String,
	pub build_root: String,
	pub env: Vec<ResolvedEnvVar>,
	pub port: Option<ResolvedPort>,
	/// Additive and ordered: tcp liveness, tcp readiness, then one http liveness probe per http check.
	pub probes: Vec<Probe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEnvVar {
	pub name: String,
	pub value: String,
}

impl From<&EnvVar> for ResolvedEnvVar {
	fn from(var: &EnvVar) -> Self {
		Self {
			name: var.name.clone(),
			value: var.value.as_text(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPort {
	pub number: i64,
	pub name: Option<String>,
	pub protocol: Option<String>,
	/// The port exposed by the service, kept as text like the replica count.
	pub service_port: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
	pub name: String,
	pub target: ServiceTarget,
	pub service_type: Option<String>,
}

/// The containers selected for exposure through the service manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceTarget {
	AllContainers,
	Container(String),
}

impl ServiceTarget {
	pub fn from_text(text: &str) -> Self {
		if text == ALL_CONTAINERS_TARGET {
			Self::AllContainers
		} else {
			Self::Container(text.to_string())
		}
	}

	pub fn selects(&self, container_name: &str) -> bool {
		match self {
			Self::AllContainers => true,
			Self::Container(name) => name == container_name,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProbeKind {
	#[serde(rename = "livenessProbe")]
	Liveness,
	#[serde(rename = "readinessProbe")]
	Readiness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeHandler {
	TcpSocket { port: i64 },
	HttpGet { path: String, port: i64, scheme: String },
}

/// A health check, with the fixed timing policy applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Probe {
	pub kind: ProbeKind,
	pub handler: ProbeHandler,
	pub failure_threshold: u32,
	pub success_threshold: u32,
	pub initial_delay_seconds: u32,
	pub period_seconds: u32,
	pub timeout_seconds: u32,
}

impl Probe {
	const FAILURE_THRESHOLD: u32 = 3;
	const SUCCESS_THRESHOLD: u32 = 1;
	const TIMEOUT_SECONDS: u32 = 10;
	const INITIAL_DELAY_SECONDS: u32 = 30;

	const fn new(kind: ProbeKind, handler: ProbeHandler, period_seconds: u32) -> Self {
		Self {
			kind,
			handler,
			failure_threshold: Self::FAILURE_THRESHOLD,
			success_threshold: Self::SUCCESS_THRESHOLD,
			initial_delay_seconds: Self::INITIAL_DELAY_SECONDS,
			period_seconds,
			timeout_seconds: Self::TIMEOUT_SECONDS,
		}
	}

	pub const fn tcp_liveness(port: i64) -> Self {
		Self::new(ProbeKind::Liveness, ProbeHandler::TcpSocket { port }, 30)
	}

	pub const fn tcp_readiness(port: i64) -> Self {
		Self::new(ProbeKind::Readiness, ProbeHandler::TcpSocket { port }, 10)
	}

	pub fn http_liveness(port: i64) -> Self {
		Self::new(
			ProbeKind::Liveness,
			ProbeHandler::HttpGet {
				path: "/".to_string(),
				port,
				scheme: "HTTP".to_string(),
			},
			30,
		)
	}

	pub const fn is_tcp(&self) -> bool {
		matches!(self.handler, ProbeHandler::TcpSocket { .. })
	}
}

/// Applies every defaulting rule to a descriptor.
pub fn resolve(descriptor: &ServiceDescriptor) -> ResolvedDescriptor {
	let local_service = descriptor.is_local_service();

	let containers = descriptor
		.containers
		.iter()
		.map(|container| resolve_container(container, local_service))
		.collect();

	ResolvedDescriptor {
		name: descriptor.name.clone(),
		hostname: descriptor.hostname.clone(),
		local_service,
		replicas: resolve_replicas(descriptor),
		containers,
		service: resolve_service(descriptor),
	}
}

pub(crate) fn resolve_replicas(descriptor: &ServiceDescriptor) -> String {
	if descriptor.is_local_service() {
		LOCAL_REPLICAS.to_string()
	} else {
		descriptor
			.replicas_text()
			.unwrap_or_else(|| DEFAULT_REPLICAS.to_string())
	}
}

fn resolve_service(descriptor: &ServiceDescriptor) -> Option<ResolvedService> {
	let target = ServiceTarget::from_text(&descriptor.service_target_text()?);

	let name = match &target {
		ServiceTarget::AllContainers => descriptor.name.clone(),
		ServiceTarget::Container(container) => format!("{}-{container}", descriptor.name),
	};

	let service_type = descriptor
		.is_local_service()
		.then(|| NODE_PORT_SERVICE_TYPE.to_string());

	Some(ResolvedService {
		name,
		target,
		service_type,
	})
}

fn resolve_container(container: &ContainerSpec, local_service: bool) -> ResolvedContainer {
	let port = container.has_port().then(|| ResolvedPort {
		number: container.port_number,
		name: container
			.port_name
			.clone()
			.filter(|name| !name.is_empty()),
		protocol: Some(container.protocol.clone()).filter(|protocol| !protocol.is_empty()),
		service_port: container
			.service_port_text()
			.unwrap_or_else(|| container.port_number.to_string()),
	});

	ResolvedContainer {
		name: container.name.clone(),
		image: container
			.image
			.clone()
			.filter(|image| !image.is_empty())
			.unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
		build_root: container
			.build_root
			.clone()
			.filter(|root| !root.is_empty())
			.unwrap_or_else(|| container.name.clone()),
		env: container.env.iter().map(ResolvedEnvVar::from).collect(),
		port,
		probes: resolve_probes(container, local_service),
	}
}

pub(crate) fn resolve_probes(container: &ContainerSpec, local_service: bool) -> Vec<Probe> {
	if !container.has_port() || local_service {
		return Vec::new();
	}

	let port = container.port_number;
	let opted_out = |flag: fn(&ProbeSpec) -> Option<bool>| {
		container
			.probes
			.iter()
			.any(|probe| flag(probe) == Some(false))
	};

	let mut probes = Vec::new();

	if !opted_out(|p| p.tcp_live) {
		probes.push(Probe::tcp_liveness(port));
	}

	if !opted_out(|p| p.tcp_ready) {
		probes.push(Probe::tcp_readiness(port));
	}

	probes.extend(
		container
			.probes
			.iter()
			.filter(|probe| probe.http_check)
			.map(|_| Probe::http_liveness(port)),
	);

	probes
}
