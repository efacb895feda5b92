use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Identifies one in-flight request within a [`RequestGeneration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Orders requests that feed the same view so that a late response to a superseded
/// request can be dropped instead of overwriting newer results.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }

    /// `Some(value)` if `ticket` is still the latest request, `None` otherwise.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(&ticket) {
            Some(value)
        } else {
            debug!("Discarding stale response for request #{}", ticket.0);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use crate::ApiClient;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_latest_ticket_wins() {
        let generation = RequestGeneration::new();
        let first = generation.begin();
        let second = generation.begin();

        assert!(!generation.is_current(&first));
        assert!(generation.is_current(&second));
        assert_eq!(generation.accept(first, "old"), None);
        assert_eq!(generation.accept(second, "new"), Some("new"));
    }

    #[tokio::test]
    async fn test_out_of_order_completion_is_discarded() {
        let app = Router::new().route(
            "/items/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let q = params.get("q").cloned().unwrap_or_default();
                if q == "slow" {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
                Json(json!([{ "item_id": q, "title": q, "pub_year": 2020 }]))
            }),
        );
        let base = test_server::spawn(app).await;
        let client = Arc::new(ApiClient::new(base.as_str()).unwrap());
        let generation = Arc::new(RequestGeneration::new());

        let slow = {
            let (client, generation) = (client.clone(), generation.clone());
            let ticket = generation.begin();
            tokio::spawn(async move {
                let results = client.search("slow", None).await.unwrap();
                generation.accept(ticket, results)
            })
        };
        let fast_ticket = generation.begin();
        let fast = client.search("fast", None).await.unwrap();

        assert!(generation.accept(fast_ticket, fast).is_some());
        assert!(slow.await.unwrap().is_none());
    }
}
