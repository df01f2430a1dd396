use std::time::Duration;

use api_types::{
    analytics::{Analytics, PeriodQuery},
    item::{Item, ItemCreated, ItemPayload, ItemsQuery, ItemsResponse},
};
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest page the backend accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client of the ledger backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        // Without the trailing slash `join` would replace the last segment.
        let mut base_url = Url::parse(base_url).map_err(|err| AppError::Setting {
            key: "base_url",
            message: err.to_string(),
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Every item of the store, unpaged.
    pub async fn list_items(&self) -> std::result::Result<Vec<Item>, ClientError> {
        let res = self
            .http
            .get(self.endpoint("items")?)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let body: ItemsResponse = decode(res).await?;
        Ok(body.items)
    }

    /// One server-side page; `limit` is clamped to what the backend accepts.
    pub async fn list_items_page(
        &self,
        query: ItemsQuery,
    ) -> std::result::Result<ItemsResponse, ClientError> {
        let query = ItemsQuery {
            page: query.page.max(1),
            limit: query.limit.clamp(1, MAX_PAGE_LIMIT),
        };
        let res = self
            .http
            .get(self.endpoint("items")?)
            .query(&query)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(res).await
    }

    pub async fn get_item(&self, id: i64) -> std::result::Result<Item, ClientError> {
        let res = self
            .http
            .get(self.endpoint(&format!("items/{id}"))?)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(res).await
    }

    /// Creates an item and returns the id the store assigned.
    pub async fn create_item(&self, payload: &ItemPayload) -> std::result::Result<i64, ClientError> {
        let res = self
            .http
            .post(self.endpoint("items")?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let created: ItemCreated = decode(res).await?;
        Ok(created.id)
    }

    pub async fn update_item(
        &self,
        id: i64,
        payload: &ItemPayload,
    ) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .put(self.endpoint(&format!("items/{id}"))?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        expect_success(res).await
    }

    pub async fn delete_item(&self, id: i64) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .delete(self.endpoint(&format!("items/{id}"))?)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        expect_success(res).await
    }

    pub async fn analytics(
        &self,
        period: PeriodQuery,
    ) -> std::result::Result<Analytics, ClientError> {
        let res = self
            .http
            .get(self.endpoint("analytics")?)
            .query(&period)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(res).await
    }

    /// The CSV report rendered by the server, as raw bytes.
    pub async fn export_report(
        &self,
        period: PeriodQuery,
    ) -> std::result::Result<Vec<u8>, ClientError> {
        let res = self
            .http
            .get(self.endpoint("items/export")?)
            .query(&period)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        if !res.status().is_success() {
            return Err(error_from(res).await);
        }
        let bytes = res.bytes().await.map_err(ClientError::Transport)?;
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::BadRequest(format!("invalid url {path}: {err}")))
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> std::result::Result<T, ClientError> {
    if !res.status().is_success() {
        return Err(error_from(res).await);
    }
    let bytes = res.bytes().await.map_err(ClientError::Transport)?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

async fn expect_success(res: Response) -> std::result::Result<(), ClientError> {
    if res.status().is_success() {
        return Ok(());
    }
    Err(error_from(res).await)
}

/// Maps a non-2xx response, reading either a `{"error": ...}` body or plain
/// text.
async fn error_from(res: Response) -> ClientError {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| text.trim().to_string());
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        message
    };

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::BadRequest(message)
        }
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
