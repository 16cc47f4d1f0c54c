use crate::{
	resolve::{ResolvedDescriptor, ResolvedService},
	*,
};

/// The content of the service-exposure manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDocument {
	pub name: String,
	/// The app label used as the selector.
	pub app: String,
	pub service_type: Option<String>,
	pub ports: Vec<ServicePortEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePortEntry {
	pub name: String,
	pub port: String,
	pub protocol: Option<String>,
	pub target_port: i64,
}

/// Composes the service manifest, if the descriptor asks for one.
///
/// Containers without a port are left out. A target that matches no container yields a service without
/// ports, and duplicated container names yield duplicated entries.
pub fn compose_service(resolved: &ResolvedDescriptor) -> Option<ServiceDocument> {
	let ResolvedService {
		name,
		target,
		service_type,
	} = resolved.service.as_ref()?;

	let ports = resolved
		.containers
		.iter()
		.filter(|container| target.selects(&container.name))
		.filter_map(|container| {
			let port = container.port.as_ref()?;

			Some(ServicePortEntry {
				name: container.name.clone(),
				port: port.service_port.clone(),
				protocol: port.protocol.clone(),
				target_port: port.number,
			})
		})
		.collect();

	Some(ServiceDocument {
		name: name.clone(),
		app: resolved.name.clone(),
		service_type: service_type.clone(),
		ports,
	})
}
