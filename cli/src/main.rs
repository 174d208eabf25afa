//! cf-recycle - zero-downtime instance recycling for Cloud Foundry

use std::process::ExitCode;

use clap::Parser;

use cf_recycle::cli::Cli;
use cf_recycle::logging;
use cf_recycle::output::json::format_command_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match json.then(|| format_command_error(&e)) {
                Some(Ok(doc)) => println!("{doc}"),
                _ => eprintln!("Error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}
