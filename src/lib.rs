//! Batch import of recipe records into an AnyList account.
//!
//! Pending recipes are read from `recipes.json` in a data directory,
//! validated, created through a [`RecipeService`] session and filed into
//! their collections. Results are archived to `imported.json` and
//! `errors.json`.
//!
//! # Quick start
//!
//! ```no_run
//! use anylist_import::{BatchImporter, ImporterConfig};
//!
//! # async fn run() -> Result<(), anylist_import::ImportError> {
//! let config = ImporterConfig::load()?;
//! let summary = BatchImporter::builder().config(&config).build()?.run().await?;
//! println!("Imported {} recipe(s)", summary.imported.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod collections;
pub mod config;
pub mod error;
pub mod importer;
pub mod model;
pub mod orchestrator;
pub mod service;
pub mod time;
pub mod validate;

pub use archive::DataPaths;
pub use collections::{add_recipe_to_collections, ensure_collection};
pub use crate::config::{Credentials, ImporterConfig, ServiceConfig};
pub use error::{ImportError, ServiceError, ServiceErrorKind};
pub use importer::{build_new_recipe, build_note, import_recipe};
pub use model::{
    Collection, CollectionFailure, CollectionResult, FailedRecord, ImportResult, NewRecipe,
    RecipeId, RecipeRecord,
};
pub use orchestrator::{BatchImporter, BatchImporterBuilder, BatchSummary};
pub use service::{HttpConnector, HttpRecipeService, RecipeService, ServiceConnector};
pub use time::parse_time_to_seconds;
pub use validate::{validate_recipe, Validation};

/// Import everything pending in the configured data directory over HTTP.
///
/// Convenience wrapper around [`BatchImporter`].
pub async fn import_pending(
    config: &ImporterConfig,
    dry_run: bool,
) -> Result<BatchSummary, ImportError> {
    let credentials = config.credentials()?;

    BatchImporter::builder()
        .config(config)
        .credentials(credentials)
        .dry_run(dry_run)
        .build()?
        .run()
        .await
}
