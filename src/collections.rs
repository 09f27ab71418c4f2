use log::debug;

use crate::model::{Collection, CollectionResult, RecipeId};
use crate::service::RecipeService;
use crate::ServiceError;

/// Return the collection with the given name, creating it if needed.
///
/// Names match case-insensitively. If creation is rejected because the
/// collection already exists (someone else created it in the meantime),
/// the listing is consulted once more before giving up.
pub async fn ensure_collection(
    service: &dyn RecipeService,
    name: &str,
) -> Result<Collection, ServiceError> {
    if let Some(existing) = find_collection(service, name).await {
        return Ok(existing);
    }

    match service.create_collection(name).await {
        Ok(collection) => Ok(collection),
        Err(e) if e.is_already_exists() => {
            debug!("Collection '{}' already exists, looking it up again", name);
            find_collection(service, name).await.ok_or(e)
        }
        Err(e) => Err(e),
    }
}

// Lookup is best-effort: a missing capability or a failed listing both
// mean "not found".
async fn find_collection(service: &dyn RecipeService, name: &str) -> Option<Collection> {
    match service.list_collections().await {
        Ok(Some(collections)) => collections
            .into_iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase()),
        Ok(None) => None,
        Err(e) => {
            debug!("Failed to list collections: {}", e);
            None
        }
    }
}

/// Add a recipe to each named collection in turn.
///
/// Each collection succeeds or fails on its own; a failure never stops the
/// remaining collections.
pub async fn add_recipe_to_collections(
    service: &dyn RecipeService,
    recipe_id: &RecipeId,
    names: &[String],
) -> Vec<CollectionResult> {
    let mut results = Vec::with_capacity(names.len());

    for name in names {
        let outcome = match ensure_collection(service, name).await {
            Ok(collection) => service.add_recipe_to_collection(&collection, recipe_id).await,
            Err(e) => Err(e),
        };

        results.push(match outcome {
            Ok(()) => CollectionResult::added(name),
            Err(e) => CollectionResult::failed(name, e.message),
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::FakeService;
    use crate::ServiceErrorKind;

    #[tokio::test]
    async fn test_existing_collection_is_reused() {
        let service = FakeService::with_listing().with_collection("c-1", "Dinner");

        let first = ensure_collection(&service, "dinner").await.unwrap();
        let second = ensure_collection(&service, "DINNER").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.identifier, "c-1");
        assert_eq!(service.state.lock().unwrap().create_collection_calls, 0);
    }

    #[tokio::test]
    async fn test_missing_collection_is_created() {
        let service = FakeService::with_listing();

        let collection = ensure_collection(&service, "Desserts").await.unwrap();

        assert_eq!(collection.name, "Desserts");
        assert_eq!(service.state.lock().unwrap().create_collection_calls, 1);
    }

    #[tokio::test]
    async fn test_without_listing_always_creates() {
        let service = FakeService::default();

        ensure_collection(&service, "Soups").await.unwrap();
        ensure_collection(&service, "Soups").await.unwrap();

        let state = service.state.lock().unwrap();
        assert_eq!(state.create_collection_calls, 2);
        assert_eq!(state.list_calls, 0);
    }

    #[tokio::test]
    async fn test_already_exists_recovers_via_listing() {
        let mut service = FakeService::with_listing();
        service.fail_create_collection.push((
            "Brunch".to_string(),
            ServiceError::new(ServiceErrorKind::AlreadyExists, "Collection already exists"),
        ));
        service.created_concurrently.insert("Brunch".to_string());

        let collection = ensure_collection(&service, "Brunch").await.unwrap();

        assert_eq!(collection.name, "Brunch");
        assert_eq!(service.state.lock().unwrap().list_calls, 2);
    }

    #[tokio::test]
    async fn test_already_exists_without_match_propagates() {
        let mut service = FakeService::with_listing();
        service.fail_create_collection.push((
            "Brunch".to_string(),
            ServiceError::new(ServiceErrorKind::AlreadyExists, "Collection already exists"),
        ));

        let err = ensure_collection(&service, "Brunch").await.unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(err.message, "Collection already exists");
    }

    #[tokio::test]
    async fn test_other_create_errors_propagate_without_retry() {
        let mut service = FakeService::with_listing();
        service.fail_create_collection.push((
            "Brunch".to_string(),
            ServiceError::new(ServiceErrorKind::Other, "quota exceeded"),
        ));

        let err = ensure_collection(&service, "Brunch").await.unwrap_err();
        assert_eq!(err.message, "quota exceeded");
        assert_eq!(service.state.lock().unwrap().list_calls, 1);
    }

    #[tokio::test]
    async fn test_partial_collection_failure() {
        let mut service = FakeService::with_listing().with_collection("c-1", "Dinner");
        service.fail_attach.insert("Dinner".to_string());

        let recipe_id = RecipeId("r-1".to_string());
        let names = vec!["Dinner".to_string(), "Quick".to_string()];
        let results = add_recipe_to_collections(&service, &recipe_id, &names).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert_eq!(results[0].error.as_deref(), Some("cannot add to Dinner"));
        assert_eq!(results[1], CollectionResult::added("Quick"));

        let state = service.state.lock().unwrap();
        assert_eq!(state.memberships.len(), 1);
        assert_eq!(state.memberships[0].1, recipe_id);
    }

    #[tokio::test]
    async fn test_no_collections() {
        let service = FakeService::with_listing();
        let results =
            add_recipe_to_collections(&service, &RecipeId("r-1".to_string()), &[]).await;
        assert!(results.is_empty());
    }
}
