use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize, de};

/// A loosely typed scalar, as found in hand-written descriptors.
///
/// Values such as `replicas: 3`, `replicas: "3"` or `localService: true` are all accepted
/// and exposed through their textual form. Floats and integers that do not fit in an `i64` are kept
/// as text, and a null value is an empty (unset) string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
	String(String),
	Num(i64),
	Bool(bool),
}

impl<'de> Deserialize<'de> for Scalar {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct ScalarVisitor;

		impl<'de> de::Visitor<'de> for ScalarVisitor {
			type Value = Scalar;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a string, number, boolean or null")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
				Ok(Scalar::String(v.to_string()))
			}

			fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
				Ok(Scalar::String(v))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
				Ok(Scalar::Num(v))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
				Ok(i64::try_from(v).map_or_else(|_| Scalar::String(v.to_string()), Scalar::Num))
			}

			// `{:?}` keeps the fractional part of round values, so `2.0` stays `2.0`
			fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
				Ok(Scalar::String(format!("{v:?}")))
			}

			fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
				Ok(Scalar::Bool(v))
			}

			fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
				Ok(Scalar::default())
			}

			fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
				Ok(Scalar::default())
			}
		}

		deserializer.deserialize_any(ScalarVisitor)
	}
}

impl Default for Scalar {
	fn default() -> Self {
		Self::String(String::new())
	}
}

impl Scalar {
	/// The textual form of this value.
	pub fn as_text(&self) -> String {
		self.to_string()
	}

	/// Whether this value should be treated as present.
	///
	/// Empty strings and a boolean `false` count as unset.
	pub fn is_set(&self) -> bool {
		match self {
			Self::String(s) => !s.is_empty(),
			Self::Num(_) => true,
			Self::Bool(b) => *b,
		}
	}

	/// Returns the textual form of this value, if it is set.
	pub fn text_if_set(&self) -> Option<String> {
		self.is_set().then(|| self.as_text())
	}
}

impl Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(s) => write!(f, "{s}"),
			Self::Num(n) => write!(f, "{n}"),
			Self::Bool(b) => write!(f, "{b}"),
		}
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Self::Num(value)
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// The declarative description of a single service and its containers.
///
/// Every field may be omitted. Missing values take their zero value, and it is up to the
/// consumer to decide how to default them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDescriptor {
	/// The identifier of the service. Used as the app label, the name of the generated manifests and the prefix for CI jobs.
	pub name: String,

	/// Selects which containers are exposed through a service.
	///
	/// `true` exposes every container, any other value names a single container. An empty value means that no service is generated.
	#[serde(alias = "servicetarget", skip_serializing_if = "Option::is_none")]
	pub service_target: Option<Scalar>,

	/// Switches the generated manifests to local development mode (a single replica, no health checks, node-exposed service).
	#[serde(alias = "localservice", skip_serializing_if = "Option::is_none")]
	pub local_service: Option<Scalar>,

	/// The hostname of the service. It is carried through but not rendered.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hostname: Option<String>,

	/// The number of replicas. Rendered verbatim.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub replicas: Option<Scalar>,

	/// The containers of this service, in rendering order.
	pub containers: Vec<ContainerSpec>,
}

impl ServiceDescriptor {
	/// Creates a new descriptor with the given name and no containers.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	/// Whether local development mode is on.
	pub fn is_local_service(&self) -> bool {
		self.local_service
			.as_ref()
			.is_some_and(Scalar::is_set)
	}

	/// The raw service target, if set.
	pub fn service_target_text(&self) -> Option<String> {
		self.service_target
			.as_ref()
			.and_then(Scalar::text_if_set)
	}

	/// The raw replica count, if set.
	pub fn replicas_text(&self) -> Option<String> {
		self.replicas.as_ref().and_then(Scalar::text_if_set)
	}

	/// Finds a container by its exact name.
	pub fn container(&self, name: &str) -> Option<&ContainerSpec> {
		self.containers.iter().find(|c| c.name == name)
	}
}

/// A single container in a [`ServiceDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerSpec {
	/// The name of the container. Must be unique within its descriptor.
	pub name: String,

	/// The image of the container. Falls back to a base image if missing.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,

	/// The build context for this container's image, used by the CI pipeline. Defaults to the name of the container.
	#[serde(alias = "buildroot", skip_serializing_if = "Option::is_none")]
	pub build_root: Option<String>,

	/// The environment variables of the container, in rendering order.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub env: Vec<EnvVar>,

	/// The port exposed by the container. `0` means that the container has no network port.
	///
	/// Out-of-range values are accepted here and echoed verbatim, validation reports them.
	#[serde(alias = "portnumber")]
	pub port_number: i64,

	/// An optional label for the port.
	#[serde(alias = "portname", skip_serializing_if = "Option::is_none")]
	pub port_name: Option<String>,

	/// The port exposed by the service for this container. Defaults to the container's port.
	#[serde(alias = "serviceport", skip_serializing_if = "Option::is_none")]
	pub service_port: Option<Scalar>,

	/// The transport protocol token for the port. Passed through as is.
	pub protocol: String,

	/// The health check toggles for this container.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub probes: Vec<ProbeSpec>,
}

impl ContainerSpec {
	/// Creates a new container with the given name and no port.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	/// Whether the container exposes a network port.
	pub const fn has_port(&self) -> bool {
		self.port_number != 0
	}

	/// The raw service port, if set.
	pub fn service_port_text(&self) -> Option<String> {
		self.service_port
			.as_ref()
			.and_then(Scalar::text_if_set)
	}
}

/// A name/value pair for a container's environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EnvVar {
	pub name: String,
	pub value: Scalar,
}

impl EnvVar {
	pub fn new(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// A set of health check toggles. Each entry of a container's probe list is evaluated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeSpec {
	/// Toggles the tcp readiness check. Only an explicit `false` has an effect, since the check is on by default for containers with a port.
	#[serde(alias = "tcpready", skip_serializing_if = "Option::is_none")]
	pub tcp_ready: Option<bool>,

	/// Toggles the tcp liveness check. Only an explicit `false` has an effect, since the check is on by default for containers with a port.
	#[serde(alias = "tcplive", skip_serializing_if = "Option::is_none")]
	pub tcp_live: Option<bool>,

	/// Adds an http liveness check on `/`.
	#[serde(alias = "httpcheck")]
	pub http_check: bool,
}

impl ProbeSpec {
	pub const fn http() -> Self {
		Self {
			tcp_ready: None,
			tcp_live: None,
			http_check: true,
		}
	}
}
