use crate::commands::{run_personas, run_simulation, PersonasArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use purchase_sim::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Purchase Simulator",
    about = "Simulate purchase decisions for synthetic customer profiles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single simulation and print the result card
    Simulate(SimulateArgs),
    /// List the persona catalog used for matching
    Personas(PersonasArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulation(args),
        Command::Personas(args) => run_personas(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purchase_sim::simulation::DistanceMetric;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["purchase-sim-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn simulate_accepts_negative_price_changes_and_metric_names() {
        let cli = Cli::try_parse_from([
            "purchase-sim-api",
            "simulate",
            "--risk-seeking",
            "0.4",
            "--market-susceptibility",
            "0.6",
            "--income",
            "52000",
            "--original-price",
            "120",
            "--price-change",
            "-12.5",
            "--metric",
            "manhattan",
            "--fractions",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Simulate(args)) => {
                assert_eq!(args.price_change, -12.5);
                assert_eq!(args.metric, Some(DistanceMetric::Manhattan));
                assert!(args.fractions);
                assert!(args.count.is_none());
            }
            other => panic!("expected simulate command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let result = Cli::try_parse_from([
            "purchase-sim-api",
            "simulate",
            "--risk-seeking",
            "40",
            "--market-susceptibility",
            "60",
            "--income",
            "52000",
            "--original-price",
            "120",
            "--price-change",
            "5",
            "--metric",
            "cosine",
        ]);
        assert!(result.is_err());
    }
}
