use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::GenerateArgs;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match cli.command {
        Commands::Generate {
            out,
            seed,
            reference_date,
            config,
            topology,
            equipment,
            maintenance_records,
            sensors,
            alerts,
            customers,
            installations,
        } => commands::generate(GenerateArgs {
            out,
            seed,
            reference_date,
            config,
            topology,
            equipment,
            maintenance_records,
            sensors,
            alerts,
            customers,
            installations,
        }),
        Commands::Validate { data } => commands::validate(&data),
        Commands::Report {
            scenario,
            data,
            topology,
            equipment,
            as_of,
            top,
        } => commands::report(
            scenario,
            &data,
            topology.as_deref(),
            equipment.as_deref(),
            as_of,
            top,
        ),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
