use std::process::ExitCode;

fn main() -> ExitCode {
    doorstep_cli::run()
}
