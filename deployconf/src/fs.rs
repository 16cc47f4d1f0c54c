use std::{
	fs::File,
	io::{ErrorKind, Write},
};

use serde::de::DeserializeOwned;

use crate::*;

pub fn get_extension(file: &Path) -> AppResult<&str> {
	file.extension()
		.and_then(|ext| ext.to_str())
		.ok_or_else(|| anyhow!("File `{}` has no extension", file.display()).into())
}

/// Deserializes a file, picking the format from its extension (yaml, toml or json).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
	match get_extension(path)? {
		"yaml" | "yml" => deserialize_yaml(path),
		"toml" => deserialize_toml(path),
		"json" => deserialize_json(path),
		other => Err(AppError::DeserializationError {
			file: path.to_path_buf(),
			error: format!("Invalid file format `{other}`. Allowed formats are: yaml, toml, json"),
		}),
	}
}

pub fn deserialize_toml<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
	let contents = read_file(path)?;

	toml::from_str(&contents).map_err(|e| AppError::DeserializationError {
		file: path.to_path_buf(),
		error: e.to_string(),
	})
}

pub fn deserialize_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
	let contents = read_file(path)?;

	serde_json::from_str(&contents).map_err(|e| AppError::DeserializationError {
		file: path.to_path_buf(),
		error: e.to_string(),
	})
}

pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
	let contents = read_file(path)?;

	serde_yaml_ng::from_str(&contents).map_err(|e| AppError::DeserializationError {
		file: path.to_path_buf(),
		error: e.to_string(),
	})
}

pub fn read_file(path: &Path) -> AppResult<String> {
	read_to_string(path).map_err(|e| AppError::ReadError {
		path: path.to_path_buf(),
		source: e,
	})
}

pub fn write_file(path: &Path, content: &str, overwrite: bool) -> AppResult<()> {
	let mut file = open_file_if_overwriting(overwrite, path)?;

	file.write_all(content.as_bytes())
		.map_err(|e| AppError::WriteError {
			path: path.to_path_buf(),
			source: e,
		})
}

pub fn open_file_if_overwriting(overwrite: bool, path: &Path) -> AppResult<File> {
	if overwrite {
		File::create(path).map_err(|e| AppError::WriteError {
			path: path.to_path_buf(),
			source: e,
		})
	} else {
		File::create_new(path).map_err(|e| match e.kind() {
			ErrorKind::AlreadyExists => AppError::FileExists {
				path: path.to_path_buf(),
			},
			_ => AppError::WriteError {
				path: path.to_path_buf(),
				source: e,
			},
		})
	}
}

pub(crate) fn create_parent_dirs(path: &Path) -> AppResult<()> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => create_all_dirs(parent),
		_ => Ok(()),
	}
}

pub(crate) fn create_all_dirs(path: &Path) -> AppResult<()> {
	create_dir_all(path).map_err(|e| AppError::DirCreation {
		path: path.to_path_buf(),
		source: e,
	})
}
