use pv_core::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

pub mod api;
pub mod generation;

pub use api::ApiClient;
pub use generation::{RequestGeneration, Ticket};

pub const DEFAULT_HOSTNAME: &str = "http://127.0.0.1:8000";

/// GET `url` and decode the JSON body as `T`.
///
/// Any non-2xx status fails with [`Error::HttpStatus`]; a body that does not match `T`
/// fails with [`Error::Shape`]. Use `serde_json::Value` for an untyped result.
pub async fn fetch_data<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T> {
    debug!("GET {}", url);
    let response = client.get(url.clone()).send().await?;
    decode(url, response).await
}

/// POST `body` as JSON to `url` and decode the JSON answer as `T`.
pub async fn post_data<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &Client,
    url: Url,
    body: &B,
) -> Result<T> {
    debug!("POST {}", url);
    let response = client.post(url.clone()).json(body).send().await?;
    decode(url, response).await
}

async fn decode<T: DeserializeOwned>(url: Url, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus(status.as_u16()));
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::Shape(format!("{}: {}", url.path(), e)))
}

pub mod prelude {
    pub use super::{fetch_data, post_data, ApiClient, RequestGeneration, Ticket};
    pub use pv_core::{Article, ArticleDetail, Error, Result};
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;
    use tokio::net::TcpListener;
    use url::Url;

    /// Serve `app` on an ephemeral local port and return its base URL.
    pub async fn spawn(app: Router) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}", addr)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    async fn server() -> Url {
        test_server::spawn(
            Router::new()
                .route("/ok", get(|| async { Json(json!({"x": 1})) }))
                .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
                .route("/broken", get(|| async { "<html>" })),
        )
        .await
    }

    #[tokio::test]
    async fn test_fetch_data_success() {
        let base = server().await;
        let value: Value = fetch_data(&Client::new(), base.join("/ok").unwrap()).await.unwrap();
        assert_eq!(value, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_fetch_data_status_error() {
        let base = server().await;
        let err = fetch_data::<Value>(&Client::new(), base.join("/missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus(404)));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "status code 404");
    }

    #[tokio::test]
    async fn test_fetch_data_shape_error() {
        let base = server().await;
        let err = fetch_data::<Value>(&Client::new(), base.join("/broken").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }
}
