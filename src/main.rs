use std::process::ExitCode;

use zcp::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = zcp::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&out::error_chain(&e));
            ExitCode::FAILURE
        }
    }
}
