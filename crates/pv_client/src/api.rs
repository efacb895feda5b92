use std::collections::HashMap;
use pv_core::{Article, ArticleDetail, Error, ItemInfo, PlotPoint, RatingRequest, Result, SimilarityQuery};
use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;
use crate::{fetch_data, post_data};

/// Typed access to the `/items/...` backend surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(hostname: &str) -> Result<Self> {
        Self::with_client(Client::new(), hostname)
    }

    pub fn with_client(client: Client, hostname: &str) -> Result<Self> {
        let base = Url::parse(hostname).map_err(|e| Error::InvalidUrl(format!("{}: {}", hostname, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(hostname.to_string()));
        }
        Ok(Self { client, base })
    }

    pub fn hostname(&self) -> &Url {
        &self.base
    }

    /// Build `<base>/<segments...>`, percent-encoding every segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_limit(mut url: Url, n: Option<usize>) -> Url {
        if let Some(n) = n {
            url.query_pairs_mut().append_pair("n", &n.to_string());
        }
        url
    }

    /// Keyword search on title and authors.
    pub async fn search(&self, q: &str, n: Option<usize>) -> Result<Vec<Article>> {
        let mut url = self.endpoint(&["items", "search"])?;
        url.query_pairs_mut().append_pair("q", q);
        fetch_data(&self.client, Self::with_limit(url, n)).await
    }

    pub async fn random(&self, n: Option<usize>) -> Result<Vec<Article>> {
        let url = self.endpoint(&["items", "random"])?;
        fetch_data(&self.client, Self::with_limit(url, n)).await
    }

    pub async fn item(&self, item_id: &str) -> Result<ArticleDetail> {
        fetch_data(&self.client, self.endpoint(&["items", item_id])?).await
    }

    pub async fn similar(&self, item_id: &str, n: Option<usize>) -> Result<Vec<Article>> {
        let url = self.endpoint(&["items", item_id, "similar"])?;
        fetch_data(&self.client, Self::with_limit(url, n)).await
    }

    /// Articles similar to a free text such as an abstract.
    pub async fn similar_to_text(&self, text: &str, n: Option<usize>) -> Result<Vec<Article>> {
        if text.trim().is_empty() {
            return Err(Error::Validation(
                "Enter an abstract to find related articles.".to_string(),
            ));
        }
        let body = SimilarityQuery { q: text.to_string(), n };
        post_data(&self.client, self.endpoint(&["items", "similar"])?, &body).await
    }

    pub async fn recommendations(&self, user_id: &str, n: Option<usize>) -> Result<Vec<Article>> {
        let url = self.endpoint(&["users", user_id, "recommendations"])?;
        fetch_data(&self.client, Self::with_limit(url, n)).await
    }

    /// Create or update the rating of `item_id` for `user_id`; `rating` must be in `[-1, 1]`.
    pub async fn rate(&self, item_id: &str, user_id: &str, rating: f64) -> Result<Value> {
        if !(-1.0..=1.0).contains(&rating) {
            return Err(Error::Validation(format!("Rating {} outside [-1, 1]", rating)));
        }
        let body = RatingRequest {
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
            rating,
        };
        let response = post_data(&self.client, self.endpoint(&["ratings"])?, &body).await?;
        info!("👍 Rated {} with {}", item_id, rating);
        Ok(response)
    }

    pub async fn health(&self) -> Result<Value> {
        fetch_data(&self.client, self.endpoint(&["health"])?).await
    }

    pub async fn item_info(&self) -> Result<HashMap<String, ItemInfo>> {
        fetch_data(&self.client, self.endpoint(&["static_json_item_info"])?).await
    }

    pub async fn xyc(&self) -> Result<Vec<PlotPoint>> {
        fetch_data(&self.client, self.endpoint(&["static_json_xyc"])?).await
    }
}
