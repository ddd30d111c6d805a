use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::{Item, ItemDraft};
use crate::web::models::{DeleteResponse, HealthResponse};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load items";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add item";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update item";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete item";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{context}: {reason}")]
    Transport {
        context: &'static str,
        reason: String,
    },

    #[error("{context}: unexpected response ({reason})")]
    Decode {
        context: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn health(&self) -> Result<bool> {
        const CONTEXT: &str = "Health check failed";
        let response = self
            .http
            .get(self.endpoint(&["api", "health"]))
            .send()
            .await
            .map_err(|err| transport(CONTEXT, err))?;
        let body: HealthResponse = expect_json(response, CONTEXT).await?;
        Ok(body.ok)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let response = self
            .http
            .get(self.endpoint(&["api", "items"]))
            .send()
            .await
            .map_err(|err| transport(LOAD_FAILED_MESSAGE, err))?;
        expect_json(response, LOAD_FAILED_MESSAGE).await
    }

    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item> {
        let response = self
            .http
            .post(self.endpoint(&["api", "items"]))
            .json(draft)
            .send()
            .await
            .map_err(|err| transport(ADD_FAILED_MESSAGE, err))?;
        expect_json(response, ADD_FAILED_MESSAGE).await
    }

    pub async fn update_item(&self, id: &str, draft: &ItemDraft) -> Result<Item> {
        let response = self
            .http
            .put(self.endpoint(&["api", "items", id]))
            .json(draft)
            .send()
            .await
            .map_err(|err| transport(UPDATE_FAILED_MESSAGE, err))?;
        expect_json(response, UPDATE_FAILED_MESSAGE).await
    }

    /// Deletes `id` and returns the item the server removed.
    pub async fn delete_item(&self, id: &str) -> Result<Item> {
        let response = self
            .http
            .delete(self.endpoint(&["api", "items", id]))
            .send()
            .await
            .map_err(|err| transport(DELETE_FAILED_MESSAGE, err))?;
        let body: DeleteResponse = expect_json(response, DELETE_FAILED_MESSAGE).await?;
        Ok(body.removed)
    }
}

fn transport(context: &'static str, err: reqwest::Error) -> ClientError {
    ClientError::Transport {
        context,
        reason: err.to_string(),
    }
}

async fn expect_json<T: DeserializeOwned>(response: Response, context: &'static str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: context.to_string(),
        });
    }

    response.json::<T>().await.map_err(|err| ClientError::Decode {
        context,
        reason: err.to_string(),
    })
}
