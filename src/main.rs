use std::process::ExitCode;

fn main() -> ExitCode {
    match morsel_sales::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Exiting with error: {err}");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
