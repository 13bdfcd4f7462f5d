use crate::core::{ConfigProvider, ImageFetcher, Result, Store, StoreSource};
use crate::utils::error::LocatorError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Store directory served over HTTP as `GET {endpoint}/stores[?q=...]`.
pub struct HttpStoreSource {
    client: Client,
    stores_url: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpStoreSource {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            stores_url: format!("{}/stores", endpoint.trim_end_matches('/')),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let mut source = Self::new(config.endpoint());
        source.timeout = config.timeout_seconds().map(Duration::from_secs);
        source
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn stores_url(&self) -> &str {
        &self.stores_url
    }

    fn request(&self) -> RequestBuilder {
        let mut request = self.client.get(&self.stores_url);

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }

    async fn fetch_stores(&self, request: RequestBuilder) -> Result<Vec<Store>> {
        let response = request.send().await.map_err(|e| {
            LocatorError::unavailable(format!("request to {} failed: {}", self.stores_url, e))
        })?;

        tracing::debug!("Directory response status: {}", response.status());

        if !response.status().is_success() {
            return Err(LocatorError::unavailable(format!(
                "{} answered with status {}",
                self.stores_url,
                response.status()
            )));
        }

        response
            .json::<Vec<Store>>()
            .await
            .map_err(|e| LocatorError::unavailable(format!("malformed payload: {}", e)))
    }
}

#[async_trait]
impl StoreSource for HttpStoreSource {
    async fn list_all(&self) -> Result<Vec<Store>> {
        tracing::debug!("Making directory request to: {}", self.stores_url);
        self.fetch_stores(self.request()).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Store>> {
        tracing::debug!("Making directory search to: {} (q={})", self.stores_url, query);
        self.fetch_stores(self.request().query(&[("q", query)])).await
    }
}

/// Fetches image bytes. Relative refs are resolved against `base_url`.
pub struct HttpImageFetcher {
    client: Client,
    base_url: Option<Url>,
    timeout: Option<Duration>,
}

impl HttpImageFetcher {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url
            .map(|base| {
                // without the trailing slash, `join` would replace the last segment
                let base = if base.ends_with('/') {
                    base.to_string()
                } else {
                    format!("{}/", base)
                };
                Url::parse(&base).map_err(|e| LocatorError::InvalidConfigValueError {
                    field: "images.base_url".to_string(),
                    value: base.clone(),
                    reason: format!("Invalid URL format: {}", e),
                })
            })
            .transpose()?;

        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut fetcher = Self::new(config.image_base_url())?;
        fetcher.timeout = config.timeout_seconds().map(Duration::from_secs);
        Ok(fetcher)
    }

    pub fn resolve(&self, image_ref: &str) -> Result<Url> {
        match Url::parse(image_ref) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(image_ref.trim_start_matches('/'))
                    .map_err(|e| LocatorError::fetch_failed(image_ref, e.to_string())),
                None => Err(LocatorError::fetch_failed(
                    image_ref,
                    "relative image reference and no image base URL configured",
                )),
            },
            Err(e) => Err(LocatorError::fetch_failed(image_ref, e.to_string())),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>> {
        let url = self.resolve(image_ref)?;

        let mut request = self.client.get(url.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LocatorError::fetch_failed(image_ref, e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocatorError::fetch_failed(
                image_ref,
                format!("status {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LocatorError::fetch_failed(image_ref, e.to_string()))?;

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
