#![forbid(unsafe_code)]

use clap::Parser;
use surfswitch_harness::Cli;

fn main() {
    let cli = Cli::parse();
    surfswitch_harness::init_logging(cli.verbose);
    match surfswitch_harness::execute(&cli) {
        Ok(output) => print!("{output}"),
        Err(error) => {
            if cli.json {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "status": "error",
                        "error": error.to_string(),
                        "exit_code": error.exit_code(),
                    })
                );
            } else {
                eprintln!("error: {error}");
            }
            std::process::exit(error.exit_code());
        }
    }
}
