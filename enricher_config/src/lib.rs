mod schema;

pub use schema::{Config, DatabaseConfig, JobsConfig, MachineLearningEndpoint};
