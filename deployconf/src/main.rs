use std::process::ExitCode;

use deployconf::{cli, logging::init_logging};

fn main() -> ExitCode {
	init_logging();

	cli::main_entrypoint()
}
