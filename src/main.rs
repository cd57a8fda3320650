use clap::Parser;
use pinroster::StoreError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = pinroster::cli::Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            // Rejected requests (bad admin PIN, unknown name, ...) exit 2.
            let rejected = err
                .downcast_ref::<StoreError>()
                .is_some_and(StoreError::is_rejection);
            ExitCode::from(if rejected { 2 } else { 1 })
        }
    }
}
