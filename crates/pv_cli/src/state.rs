use std::num::NonZeroUsize;
use std::sync::Arc;
use pv_client::{ApiClient, RequestGeneration};
use pv_core::identity;
use pv_core::{Article, CookieJar, HistoryStore, KeyValueStore, Result};
use tracing::{error, info, warn};
use crate::config::Config;
use crate::views::{self, ListMode};

pub const RATING_LIKE: f64 = 1.0;
pub const RATING_DISLIKE: f64 = -1.0;

/// Everything the views need, handed to them explicitly.
pub struct AppState {
    pub hostname: String,
    pub api: Arc<ApiClient>,
    pub history: HistoryStore,
    pub cookies: Arc<dyn CookieJar>,
    pub generation: Arc<RequestGeneration>,
    pub current_article: Option<String>,
    /// Which list sits next to the open article; compare and recommendation lists
    /// stay on screen when an article from them is opened.
    pub list_mode: ListMode,
    pub search_results_visible: bool,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let storage = pv_storage::create_storage(&config.storage, &config.data_dir).await?;
        let cookies = pv_storage::create_cookie_jar(&config.storage, &config.data_dir).await?;
        let api = Arc::new(ApiClient::new(&config.hostname)?);
        Ok(Self::from_parts(config.hostname.clone(), api, storage, cookies, config.history_limit))
    }

    pub fn from_parts(
        hostname: String,
        api: Arc<ApiClient>,
        storage: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieJar>,
        history_limit: Option<NonZeroUsize>,
    ) -> Self {
        let history = HistoryStore::new(storage);
        let history = match history_limit {
            Some(limit) => history.with_capacity(limit),
            None => history,
        };
        Self {
            hostname,
            api,
            history,
            cookies,
            generation: Arc::new(RequestGeneration::new()),
            current_article: None,
            list_mode: ListMode::Similar,
            search_results_visible: false,
        }
    }

    /// Where map points link to: the article detail route of the web front-end.
    pub fn item_link_base(&self) -> String {
        format!("{}/#/items/", self.hostname)
    }

    pub async fn user_id(&self) -> Result<String> {
        identity::user_id(self.cookies.as_ref()).await
    }

    pub async fn search(&mut self, query: &str, n: Option<usize>) -> Result<Option<String>> {
        let ticket = self.generation.begin();
        let results = self.api.search(query, n).await?;
        Ok(self.generation.accept(ticket, results).map(|results| {
            self.search_results_visible = true;
            self.list_mode = ListMode::Similar;
            views::render_search_results(&results)
        }))
    }

    pub fn hide_search_results(&mut self) {
        self.search_results_visible = false;
    }

    /// Open an article: render its detail, remember it as current and record it in the
    /// history. The similar-articles list is only loaded outside compare and
    /// recommendation mode, where the list on screen is kept. A history that cannot
    /// be written is logged and does not keep the article from showing.
    pub async fn load_article(&mut self, item_id: &str, mode: ListMode) -> Result<String> {
        self.hide_search_results();
        let detail = self.api.item(item_id).await?;
        self.current_article = Some(detail.article.item_id.clone());
        if let Err(e) = self.history.push(Article::from(detail.clone())).await {
            warn!("Could not record {} in history: {}", detail.article.item_id, e);
        }
        info!("📖 Opened {}", detail.article.item_id);

        let mut out = views::render_article(&detail);
        if mode == ListMode::Similar {
            let similar = self.api.similar(item_id, None).await?;
            out.push('\n');
            out.push_str(&views::render_article_list(&similar, ListMode::Similar));
        }
        Ok(out)
    }

    pub async fn similar(&self, item_id: &str, n: Option<usize>) -> Result<String> {
        let similar = self.api.similar(item_id, n).await?;
        Ok(views::render_article_list(&similar, ListMode::Similar))
    }

    pub async fn compare(&mut self, text: &str, n: Option<usize>) -> Result<String> {
        let results = self.api.similar_to_text(text, n).await?;
        self.list_mode = ListMode::Compare;
        Ok(views::render_article_list(&results, ListMode::Compare))
    }

    pub async fn recommended(&mut self, n: Option<usize>) -> Result<String> {
        let user_id = self.user_id().await?;
        let results = self.api.recommendations(&user_id, n).await?;
        self.list_mode = ListMode::Recommendation;
        Ok(views::render_article_list(&results, ListMode::Recommendation))
    }

    pub async fn random(&self, n: Option<usize>) -> Result<String> {
        let results = self.api.random(n).await?;
        Ok(views::render_search_results(&results))
    }

    /// Rate an article. Failures are logged and reported as `false`, never raised.
    pub async fn rate(&self, item_id: &str, rating: f64) -> bool {
        let user_id = match self.user_id().await {
            Ok(user_id) => user_id,
            Err(e) => {
                error!("Failed to resolve user id: {}", e);
                return false;
            }
        };
        match self.api.rate(item_id, &user_id, rating).await {
            Ok(response) => {
                info!("Rating stored: {}", response);
                true
            }
            Err(e) => {
                error!("Failed to rate {}: {}", item_id, e);
                false
            }
        }
    }

    /// Close the open article and go back to the similar-articles layout.
    pub fn close_article(&mut self) {
        self.current_article = None;
        self.list_mode = ListMode::Similar;
    }

    pub async fn history(&self) -> String {
        views::render_history(&self.history.get().await)
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear().await?;
        info!("🧹 History cleared");
        Ok(())
    }
}
