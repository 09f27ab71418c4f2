use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::{Credentials, ServiceConfig};
use crate::model::{Collection, NewRecipe, RecipeId};
use crate::service::{RecipeService, ServiceConnector};
use crate::{ServiceError, ServiceErrorKind};

/// Logs into the recipe service's JSON API
pub struct HttpConnector {
    base_url: String,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRecipe {
    identifier: String,
}

#[async_trait]
impl ServiceConnector for HttpConnector {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn RecipeService>, ServiceError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("anylist-import/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;
        let login: LoginResponse = check(response).await?.json().await?;
        debug!("Logged in as {}", credentials.email);

        Ok(Box::new(HttpRecipeService {
            client,
            base_url: self.base_url.clone(),
            token: login.token,
        }))
    }
}

/// Session with the recipe service's JSON API
pub struct HttpRecipeService {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRecipeService {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeId, ServiceError> {
        let response = self
            .client
            .post(self.url("/recipes"))
            .bearer_auth(&self.token)
            .json(recipe)
            .send()
            .await?;

        let created: CreatedRecipe = check(response).await?.json().await?;
        debug!("Created recipe {} ({})", recipe.name, created.identifier);
        Ok(RecipeId(created.identifier))
    }

    async fn list_collections(&self) -> Result<Option<Vec<Collection>>, ServiceError> {
        let response = self
            .client
            .get(self.url("/recipe-collections"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        // Older deployments have no listing endpoint at all
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Collection listing not supported by this service");
            return Ok(None);
        }

        let collections: Vec<Collection> = check(response).await?.json().await?;
        Ok(Some(collections))
    }

    async fn create_collection(&self, name: &str) -> Result<Collection, ServiceError> {
        let response = self
            .client
            .post(self.url("/recipe-collections"))
            .bearer_auth(&self.token)
            .json(&json!({ "name": name }))
            .send()
            .await?;

        let collection: Collection = check(response).await?.json().await?;
        debug!("Created collection {} ({})", collection.name, collection.identifier);
        Ok(collection)
    }

    async fn add_recipe_to_collection(
        &self,
        collection: &Collection,
        recipe_id: &RecipeId,
    ) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url(&format!(
                "/recipe-collections/{}/recipes",
                collection.identifier
            )))
            .bearer_auth(&self.token)
            .json(&json!({ "recipeId": recipe_id }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn teardown(&self) {
        let result = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(&self.token)
            .send()
            .await;

        if let Err(e) = result {
            debug!("Logout failed: {}", e);
        }
    }
}

/// Turn a non-2xx response into a classified [`ServiceError`]
async fn check(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string()
    });

    Err(ServiceError::new(
        ServiceErrorKind::classify(Some(status.as_u16()), &detail),
        format!("{} ({})", detail, status.as_u16()),
    ))
}

fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
