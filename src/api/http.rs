//! reqwest-backed implementation of the equipment API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use super::{routes, EquipmentApi};
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{ActiveCheckout, CheckoutRequest, EquipmentItem, EquipmentType, Profile, StagedRequest},
};

/// HTTP client for the equipment backend.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Create a new client for the configured backend.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            AppError::Validation(format!("Invalid API base URL {}: {}", config.base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- Internal helpers ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn parse(&self, path: &str) -> AppResult<Url> {
        let url = self.url(path);
        Url::parse(&url).map_err(|e| AppError::Internal(format!("Bad endpoint URL {}: {}", url, e)))
    }

    async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let url = resp.url().to_string();
            let body = resp.text().await.unwrap_or_else(|_| "unknown".to_string());
            tracing::debug!(%status, %url, "Backend rejected request");
            return Err(AppError::from_status(status, body));
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> AppResult<T> {
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let resp = self.execute(self.request(Method::GET, url)).await?;
        Self::decode(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.get_url(self.parse(path)?).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, self.parse(path)?).json(body);
        let resp = self.execute(builder).await?;
        Self::decode(resp).await
    }

    /// Send a body whose reply content is ignored
    async fn send_discard<B>(&self, method: Method, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(method, self.parse(path)?).json(body);
        self.execute(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl EquipmentApi for HttpApi {
    async fn list_equipment(&self) -> AppResult<Vec<EquipmentItem>> {
        self.get(routes::EQUIPMENT_LIST).await
    }

    async fn list_equipment_types(&self) -> AppResult<Vec<EquipmentType>> {
        self.get(routes::EQUIPMENT_TYPES).await
    }

    async fn available_for_model(&self, model: &str) -> AppResult<Vec<EquipmentItem>> {
        let mut url = self.parse(routes::EQUIPMENT_FOR_REQUEST)?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal(format!("Base URL {} cannot hold a path", self.base_url)))?
            .push(model);
        self.get_url(url).await
    }

    async fn create_request(&self, request: &CheckoutRequest) -> AppResult<CheckoutRequest> {
        self.send_json(Method::POST, routes::REQUEST_CREATE, request).await
    }

    async fn delete_request(&self, request: &CheckoutRequest) -> AppResult<()> {
        self.send_discard(Method::DELETE, routes::REQUEST_DELETE, request).await
    }

    async fn list_requests(&self) -> AppResult<Vec<CheckoutRequest>> {
        self.get(routes::REQUEST_LIST).await
    }

    async fn create_staged_request(&self, staged: &StagedRequest) -> AppResult<StagedRequest> {
        self.send_json(Method::POST, routes::STAGED_CREATE, staged).await
    }

    async fn delete_staged_request(&self, staged: &StagedRequest) -> AppResult<()> {
        self.send_discard(Method::DELETE, routes::STAGED_DELETE, staged).await
    }

    async fn list_staged_requests(&self) -> AppResult<Vec<StagedRequest>> {
        self.get(routes::STAGED_LIST).await
    }

    async fn create_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout> {
        self.send_json(Method::POST, routes::CHECKOUT_CREATE, checkout).await
    }

    async fn list_active_checkouts(&self) -> AppResult<Vec<ActiveCheckout>> {
        self.get(routes::CHECKOUT_ACTIVE).await
    }

    async fn list_checkouts(&self) -> AppResult<Vec<ActiveCheckout>> {
        self.get(routes::CHECKOUT_HISTORY).await
    }

    async fn return_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout> {
        self.send_json(Method::PUT, routes::CHECKOUT_RETURN, checkout).await
    }

    async fn current_profile(&self) -> AppResult<Profile> {
        self.get(routes::PROFILE).await
    }

    async fn update_waiver(&self, profile: &Profile) -> AppResult<Profile> {
        self.send_json(Method::PUT, routes::WAIVER_UPDATE, profile).await
    }
}
