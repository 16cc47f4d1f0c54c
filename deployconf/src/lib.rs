//! Generates orchestration manifests and CI pipelines from a single service descriptor.

pub(crate) use std::{
	fmt::{self, Display},
	fs::{create_dir_all, read_to_string},
	path::{Path, PathBuf},
};

pub(crate) use anyhow::anyhow;
pub(crate) use deploy_descriptor::{ContainerSpec, ProbeSpec, ServiceDescriptor};
pub(crate) use indexmap::{IndexMap, IndexSet};
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use tracing::{debug, info, warn};

pub mod artifact;
pub mod cli;
pub mod compose;
pub mod errors;
pub mod fs;
pub mod generate;
pub mod logging;
pub mod resolve;
pub mod settings;
pub mod templating;
pub mod validation;

pub use artifact::*;
pub use errors::*;
pub use generate::*;
pub use resolve::{ResolvedDescriptor, resolve};
pub use settings::Settings;
pub use validation::{ResolutionWarning, validate};

pub use deploy_descriptor;
