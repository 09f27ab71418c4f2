mod http;

pub use http::{HttpConnector, HttpRecipeService};

use async_trait::async_trait;

use crate::config::Credentials;
use crate::model::{Collection, NewRecipe, RecipeId};
use crate::ServiceError;

/// An authenticated session with the recipe service.
///
/// Calls are made one at a time; implementations are not required to
/// handle concurrent use of the same session.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Create and persist a recipe, returning its new identifier
    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeId, ServiceError>;

    /// List the account's recipe collections.
    ///
    /// Returns `Ok(None)` when the service has no listing capability.
    async fn list_collections(&self) -> Result<Option<Vec<Collection>>, ServiceError> {
        Ok(None)
    }

    /// Create and persist a recipe collection
    async fn create_collection(&self, name: &str) -> Result<Collection, ServiceError>;

    /// Attach an existing recipe to a collection
    async fn add_recipe_to_collection(
        &self,
        collection: &Collection,
        recipe_id: &RecipeId,
    ) -> Result<(), ServiceError>;

    /// Release the session
    async fn teardown(&self);
}

/// Opens sessions with the recipe service
#[async_trait]
pub trait ServiceConnector: Send + Sync {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn RecipeService>, ServiceError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory service used by unit tests.

    use super::*;
    use crate::ServiceErrorKind;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeState {
        pub collections: Vec<Collection>,
        pub recipes: Vec<NewRecipe>,
        pub memberships: Vec<(String, RecipeId)>,
        pub list_calls: usize,
        pub create_collection_calls: usize,
        pub torn_down: bool,
    }

    #[derive(Default)]
    pub struct FakeService {
        pub state: Mutex<FakeState>,
        /// Without listing support, `list_collections` reports `None`
        pub supports_listing: bool,
        pub fail_create_recipe: Option<String>,
        /// Collection names whose creation fails with the given error
        pub fail_create_collection: Vec<(String, ServiceError)>,
        /// Collection names that appear in the listing only after a failed create
        pub created_concurrently: HashSet<String>,
        pub fail_attach: HashSet<String>,
    }

    impl FakeService {
        pub fn with_listing() -> Self {
            Self {
                supports_listing: true,
                ..Default::default()
            }
        }

        pub fn with_collection(self, identifier: &str, name: &str) -> Self {
            self.state.lock().unwrap().collections.push(Collection {
                identifier: identifier.to_string(),
                name: name.to_string(),
            });
            self
        }
    }

    #[async_trait]
    impl RecipeService for FakeService {
        async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeId, ServiceError> {
            if let Some(message) = &self.fail_create_recipe {
                return Err(ServiceError::new(ServiceErrorKind::Other, message.clone()));
            }
            let mut state = self.state.lock().unwrap();
            state.recipes.push(recipe.clone());
            Ok(RecipeId(format!("recipe-{}", state.recipes.len())))
        }

        async fn list_collections(&self) -> Result<Option<Vec<Collection>>, ServiceError> {
            if !self.supports_listing {
                return Ok(None);
            }
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            Ok(Some(state.collections.clone()))
        }

        async fn create_collection(&self, name: &str) -> Result<Collection, ServiceError> {
            let mut state = self.state.lock().unwrap();
            state.create_collection_calls += 1;

            if let Some((_, err)) = self.fail_create_collection.iter().find(|(n, _)| n == name) {
                if self.created_concurrently.contains(name) {
                    let identifier = format!("collection-{}", state.collections.len() + 1);
                    state.collections.push(Collection {
                        identifier,
                        name: name.to_string(),
                    });
                }
                return Err(err.clone());
            }

            let collection = Collection {
                identifier: format!("collection-{}", state.collections.len() + 1),
                name: name.to_string(),
            };
            state.collections.push(collection.clone());
            Ok(collection)
        }

        async fn add_recipe_to_collection(
            &self,
            collection: &Collection,
            recipe_id: &RecipeId,
        ) -> Result<(), ServiceError> {
            if self.fail_attach.contains(&collection.name) {
                return Err(ServiceError::new(
                    ServiceErrorKind::Other,
                    format!("cannot add to {}", collection.name),
                ));
            }
            self.state
                .lock()
                .unwrap()
                .memberships
                .push((collection.identifier.clone(), recipe_id.clone()));
            Ok(())
        }

        async fn teardown(&self) {
            self.state.lock().unwrap().torn_down = true;
        }
    }
}
