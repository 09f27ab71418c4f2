use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;

use crate::archive::{load_archive, load_recipes, save_json, DataPaths};
use crate::config::{Credentials, ImporterConfig, ServiceConfig};
use crate::importer::import_recipe;
use crate::model::{CollectionFailure, CollectionResult, FailedRecord, ImportResult, RecipeRecord};
use crate::service::{HttpConnector, RecipeService, ServiceConnector};
use crate::validate::validate_recipe;
use crate::ImportError;

/// Summary of one batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Number of records found in the pending file
    pub total: usize,
    /// Records that were imported (or would be, in a dry run)
    pub imported: Vec<Value>,
    /// Records that failed, with the reason
    pub failed: Vec<FailedRecord>,
    /// Collections that imported recipes could not be added to. These do
    /// not count as failures.
    pub collection_failures: Vec<CollectionFailure>,
    pub dry_run: bool,
}

/// Imports every pending recipe in a data directory
pub struct BatchImporter {
    paths: DataPaths,
    credentials: Credentials,
    connector: Box<dyn ServiceConnector>,
    dry_run: bool,
}

/// Builder for configuring a [`BatchImporter`]
#[derive(Default)]
pub struct BatchImporterBuilder {
    data_dir: Option<PathBuf>,
    credentials: Option<Credentials>,
    connector: Option<Box<dyn ServiceConnector>>,
    dry_run: bool,
}

impl BatchImporter {
    pub fn builder() -> BatchImporterBuilder {
        BatchImporterBuilder::default()
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Run the import.
    ///
    /// Records are processed one at a time in file order. Per-record
    /// failures are collected in the summary; only problems with the data
    /// files or opening the session abort the run.
    ///
    /// After a real run, successes are appended to `imported.json`,
    /// failures to `errors.json`, and if anything succeeded the pending file
    /// is emptied. Failed records are not re-queued. A dry run touches
    /// neither the service nor the files.
    pub async fn run(&self) -> Result<BatchSummary, ImportError> {
        let paths = &self.paths;
        fs::create_dir_all(&paths.dir).await?;

        let recipes = load_recipes(&paths.recipes).await?;
        let mut summary = BatchSummary {
            total: recipes.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        if recipes.is_empty() {
            info!("No recipes found in {}", paths.recipes.display());
            return Ok(summary);
        }
        info!("Found {} recipe(s) to import", recipes.len());

        // Read archives up front so a corrupt one fails before any remote call
        let mut imported: Vec<Value> = load_archive(&paths.imported).await?;
        let mut errors: Vec<FailedRecord> = load_archive(&paths.errors).await?;

        let session = if self.dry_run {
            info!("DRY RUN MODE - No recipes will be imported");
            None
        } else {
            info!("Logging into AnyList...");
            let session = self.connector.authenticate(&self.credentials).await?;
            info!("Connected");
            Some(session)
        };

        for (i, recipe) in recipes.into_iter().enumerate() {
            let name = recipe
                .get("name")
                .and_then(Value::as_str)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or("Unnamed Recipe")
                .to_string();
            info!("[{}/{}] Importing: {}", i + 1, summary.total, name);

            match self.process(session.as_deref(), &recipe).await {
                Ok(collections) => {
                    summary
                        .collection_failures
                        .extend(collections.into_iter().filter(|c| !c.success).map(|c| {
                            CollectionFailure {
                                recipe: name.clone(),
                                collection: c.name,
                                error: c.error.unwrap_or_default(),
                            }
                        }));
                    summary.imported.push(recipe);
                }
                Err(error) => {
                    info!("  Failed: {}", error);
                    summary.failed.push(FailedRecord { recipe, error });
                }
            }
        }

        if let Some(session) = session {
            session.teardown().await;
        }

        if self.dry_run {
            return Ok(summary);
        }

        if !summary.imported.is_empty() {
            imported.extend(summary.imported.iter().cloned());
            save_json(&paths.imported, &imported).await?;
        }
        if !summary.failed.is_empty() {
            errors.extend(summary.failed.iter().cloned());
            save_json(&paths.errors, &errors).await?;
        }
        if !summary.imported.is_empty() {
            save_json(&paths.recipes, &Vec::<Value>::new()).await?;
            debug!("Cleared {}", paths.recipes.display());
        }

        Ok(summary)
    }

    /// Validate and import one record.
    ///
    /// Returns the per-collection results on success and the failure reason
    /// otherwise.
    async fn process(
        &self,
        session: Option<&dyn RecipeService>,
        recipe: &Value,
    ) -> Result<Vec<CollectionResult>, String> {
        let validation = validate_recipe(recipe);
        if !validation.is_valid() {
            return Err(format!(
                "Missing required fields: {}",
                validation.errors.join(", ")
            ));
        }

        let record: RecipeRecord = serde_json::from_value(recipe.clone())
            .map_err(|e| format!("Invalid recipe: {}", e))?;

        let Some(session) = session else {
            info!("  Would import (dry run)");
            return Ok(Vec::new());
        };

        match import_recipe(session, &record).await {
            ImportResult::Imported { collections, .. } => {
                info!("  Recipe saved");
                for result in collections.iter().filter(|c| c.success) {
                    info!("  Added to: {}", result.name);
                }
                Ok(collections)
            }
            ImportResult::Failed { error } => Err(error),
        }
    }
}

impl BatchImporterBuilder {
    /// Use settings (data directory, credentials) from a loaded configuration
    pub fn config(mut self, config: &ImporterConfig) -> Self {
        self.data_dir = Some(config.data_dir.clone());
        if let Ok(credentials) = config.credentials() {
            self.credentials = Some(credentials);
        }
        if self.connector.is_none() {
            self.connector = Some(Box::new(HttpConnector::new(&config.service)));
        }
        self
    }

    /// Set the directory holding recipes.json, imported.json and errors.json
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set how sessions with the recipe service are opened
    pub fn connector(mut self, connector: impl ServiceConnector + 'static) -> Self {
        self.connector = Some(Box::new(connector));
        self
    }

    /// Validate records without contacting the service or touching files
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the importer.
    ///
    /// Fails with [`ImportError::MissingCredentials`] when no credentials
    /// were provided, even for a dry run. Without an explicit connector the
    /// HTTP client with default settings is used.
    pub fn build(self) -> Result<BatchImporter, ImportError> {
        let credentials = self.credentials.ok_or(ImportError::MissingCredentials)?;
        let connector = self
            .connector
            .unwrap_or_else(|| Box::new(HttpConnector::new(&ServiceConfig::default())));

        Ok(BatchImporter {
            paths: DataPaths::new(self.data_dir.unwrap_or_else(|| PathBuf::from("data"))),
            credentials,
            connector,
            dry_run: self.dry_run,
        })
    }
}
