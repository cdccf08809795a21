use std::process::ExitCode;

use json_schema_table::{cli, logging};

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init(command_line_interface.log_level());
    match command_line_interface.run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
