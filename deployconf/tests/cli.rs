use std::{
	fs::{create_dir_all, read_to_string, remove_dir_all},
	path::PathBuf,
};

use pretty_assertions::assert_eq;

macro_rules! path_to_str {
	($path:expr) => {
		&$path.to_string_lossy().to_string()
	};
}

macro_rules! get_bin {
	() => {
		assert_cmd::Command::new(env!("CARGO_BIN_EXE_deployconf"))
	};
}

fn reset_testing_dir<T: Into<PathBuf>>(dir: T) -> PathBuf {
	let dir: PathBuf = dir.into();
	if dir.exists() {
		remove_dir_all(dir.as_path())
			.unwrap_or_else(|e| panic!("Failed to empty the output dir '{}': {}", dir.display(), e));
	}

	create_dir_all(dir.as_path())
		.unwrap_or_else(|e| panic!("Failed to create the output dir '{}': {}", dir.display(), e));

	dir
}

#[test]
fn missing_arguments() {
	get_bin!()
		.args(["--environment", "staging"])
		.assert()
		.failure()
		.code(1)
		.stdout("ERROR: please specify a config file to parse via '--config'\n");

	get_bin!()
		.args(["--config", "tests/descriptors/shop.yaml"])
		.assert()
		.failure()
		.code(1)
		.stdout("ERROR: please specify an environment\n");

	get_bin!()
		.args(["--config", "tests/descriptors/shop.yaml", "--environment", ""])
		.assert()
		.failure()
		.code(1)
		.stdout("ERROR: please specify an environment\n");
}

#[test]
fn reports_created_files() {
	let output_dir = reset_testing_dir("tests/output/bin_report");

	let output = get_bin!()
		.args([
			"-c",
			"tests/descriptors/single_target.toml",
			"-e",
			"staging",
			"--out-dir",
			path_to_str!(output_dir),
		])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stdout = String::from_utf8(output).unwrap();

	let expected: Vec<String> = ["staging/01-service.yaml", "staging/02-deployment.yaml", ".gitlab-ci.yml"]
		.iter()
		.map(|file| format!("Created: {}", output_dir.join(file).display()))
		.collect();

	assert_eq!(stdout.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn loose_descriptor_values() {
	let output_dir = reset_testing_dir("tests/output/bin_loose_values");

	get_bin!()
		.args([
			"-c",
			"tests/descriptors/loose_values.yaml",
			"-e",
			"staging",
			"--out-dir",
			path_to_str!(output_dir),
			"--no-pipeline",
		])
		.assert()
		.success();

	let workload = read_to_string(output_dir.join("staging/02-deployment.yaml")).unwrap();

	assert!(workload.contains("  replicas: 2.0\n"));
	assert!(workload.contains("        - name: JAVA_VERSION\n          value: \"1.8\"\n"));
	assert!(workload.contains("        - name: JAVA_OPTS\n          value: \"\"\n"));
}

#[test]
fn failures_exit_with_code_one() {
	let output_dir = reset_testing_dir("tests/output/bin_failures");

	get_bin!()
		.args(["-c", "tests/descriptors/missing.yaml", "-e", "staging"])
		.assert()
		.failure()
		.code(1);

	get_bin!()
		.args([
			"-c",
			"tests/descriptors/invalid.yaml",
			"-e",
			"staging",
			"--out-dir",
			path_to_str!(output_dir),
			"--strict",
		])
		.assert()
		.failure()
		.code(1);

	assert!(!output_dir.join("staging").exists());

	get_bin!()
		.args([
			"-c",
			"tests/descriptors/shop.yaml",
			"-e",
			"staging",
			"--out-dir",
			path_to_str!(output_dir),
		])
		.assert()
		.success();

	get_bin!()
		.args([
			"-c",
			"tests/descriptors/shop.yaml",
			"-e",
			"staging",
			"--out-dir",
			path_to_str!(output_dir),
			"--no-overwrite",
		])
		.assert()
		.failure()
		.code(1);
}
