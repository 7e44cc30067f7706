//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type. Commands that
//! touch the library share one wiring routine, [`Runtime::connect`].

use std::sync::Arc;

use clap::ValueEnum;
use enricher_config::Config;
use enricher_core::{SmartInfoService, SystemConfig, SystemConfigCore};
use enricher_jobs::{InProcessJobQueue, JobReceiver};
use enricher_providers::MachineLearningClient;
use enricher_store::EnrichmentStore;
use tracing::info;

mod config;
mod info;
mod init;
mod queue;
mod run;
mod version;

pub use config::{ConfigAction, ConfigStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use queue::{QueueInput, QueueStrategy};
pub use run::{RunInput, RunStrategy};
pub use version::VersionStrategy;

/// Derived metadata a command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Feature {
    /// Object tags from the image classifier
    Tags,
    /// CLIP image embeddings
    Clip,
}

/// Everything a workflow command needs, wired from the bootstrap config.
struct Runtime {
    store: Arc<EnrichmentStore>,
    config_core: SystemConfigCore,
    service: Arc<SmartInfoService>,
    receiver: JobReceiver,
    concurrency: usize,
}

impl Runtime {
    async fn connect(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(EnrichmentStore::connect(&config.database.url).await?);
        let config_core = SystemConfigCore::new(
            store.clone(),
            SystemConfig::with_machine_learning_url(config.machine_learning.url.clone()),
        );
        let (queue, receiver) = InProcessJobQueue::channel();
        let service = Arc::new(SmartInfoService::new(
            store.clone(),
            config_core.clone(),
            Arc::new(queue),
            store.clone(),
            Arc::new(MachineLearningClient::new()),
        ));
        info!("Runtime wired with job concurrency {}", config.jobs.concurrency);

        Ok(Self {
            store,
            config_core,
            service,
            receiver,
            concurrency: config.jobs.concurrency,
        })
    }
}

/// Core trait defining the contract for all command strategies.
///
/// # Design Principles
/// - **Static dispatch**: All calls are monomorphized at compile time
/// - **Type safety**: Each strategy defines its own input type via associated type
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
