#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, ConfigAction, ConfigStrategy, Feature, InfoStrategy, InitStrategy,
    QueueInput, QueueStrategy, RunInput, RunStrategy, VersionStrategy,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "enricher")]
#[command(about = "Object tagging and CLIP encoding for a media library", long_about = None)]
struct Cli {
    /// Log per-page and per-job detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration and connection status
    Info,
    /// Queue assets for tagging or encoding and run the resulting jobs
    Queue {
        #[arg(value_enum)]
        feature: Feature,

        /// Re-process every asset, not only those missing the feature
        #[arg(short, long)]
        force: bool,
    },
    /// Tag or encode a single asset
    Run {
        #[arg(value_enum)]
        feature: Feature,

        /// Asset to process
        #[arg(long)]
        id: String,
    },
    /// Edit stored system config overrides
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Queue { feature, force } => {
            QueueStrategy
                .execute(QueueInput { feature, force })
                .await
        }
        Commands::Run { feature, id } => {
            RunStrategy
                .execute(RunInput {
                    feature,
                    asset_id: id,
                })
                .await
        }
        Commands::Config { action } => ConfigStrategy.execute(action).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use enricher_core::SystemConfigKey;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn queue_parses_feature_and_force() {
        let cli = Cli::try_parse_from(["enricher", "queue", "clip", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Queue {
                feature: Feature::Clip,
                force: true
            }
        ));
    }

    #[test]
    fn run_requires_asset_id() {
        assert!(Cli::try_parse_from(["enricher", "run", "tags"]).is_err());
        let cli = Cli::try_parse_from(["enricher", "run", "tags", "--id", "asset-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run { feature: Feature::Tags, ref id } if id == "asset-1"
        ));
    }

    #[test]
    fn config_set_parses_dotted_key() {
        let cli = Cli::try_parse_from([
            "enricher",
            "config",
            "set",
            "machineLearning.classification.minScore",
            "0.5",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Set {
                    key: SystemConfigKey::ClassificationMinScore,
                    ..
                }
            }
        ));
    }

    #[test]
    fn config_rejects_unknown_key() {
        assert!(
            Cli::try_parse_from(["enricher", "config", "reset", "machineLearning.facial"])
                .is_err()
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["enricher", "info", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
