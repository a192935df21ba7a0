use clap::{Parser, Subcommand};

use fincalc::api::{PayoffArgs, build_config, render_summary, run_http_server};
use fincalc::core::simulate_payoff;

#[derive(Parser, Debug)]
#[command(name = "fincalc", version, about = "Debt payoff simulator and finance calculators")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON calculator API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run a snowball or avalanche payoff simulation.
    Payoff(PayoffArgs),
}

#[tokio::main]
async fn main() {
    fincalc::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Payoff(args) => {
            let config = match build_config(&args) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Invalid input: {e}");
                    std::process::exit(1);
                }
            };
            let result = simulate_payoff(&config);
            if args.json {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Failed to encode result: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", render_summary(&config, &result));
            }
        }
    }
}
