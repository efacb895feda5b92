use serde::{Deserialize, Deserializer, Serialize};

/// Backend fields that are nullable on the wire but always rendered as text.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A bibliographic item as returned by list endpoints (search, similar, recommendations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub item_id: String,
    pub title: String,
    pub pub_year: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publisher: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: String,
    /// Relevance or similarity in percent, depending on where the article came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Article {
    pub fn byline(&self) -> String {
        format!("{}, {}", self.pub_year, self.authors)
    }

    pub fn without_score(mut self) -> Self {
        self.score = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub description: String,
    pub pub_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub item_url: String,
}

impl ArticleDetail {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.description
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl From<ArticleDetail> for Article {
    fn from(detail: ArticleDetail) -> Self {
        detail.article
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub item_id: String,
    pub user_id: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
}

/// Per-item metadata used for the scatterplot tooltip (`item_info.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publisher: String,
    pub pub_year: i32,
}

/// One point of the precomputed 2D layout (`xyc.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub item_id: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_nullable_fields() {
        let article: Article = serde_json::from_value(json!({
            "item_id": "a1",
            "title": "Deep Learning",
            "pub_year": 2015,
            "publisher": null,
            "authors": "Y. LeCun, Y. Bengio, G. Hinton",
            "score": null
        }))
        .unwrap();

        assert_eq!(article.publisher, "");
        assert_eq!(article.score, None);
        assert_eq!(article.byline(), "2015, Y. LeCun, Y. Bengio, G. Hinton");
    }

    #[test]
    fn test_score_omitted_when_absent() {
        let article = Article {
            item_id: "a1".to_string(),
            title: "T1".to_string(),
            pub_year: 2020,
            publisher: "Nature".to_string(),
            authors: "A. Author".to_string(),
            score: Some(87.5),
        };
        let value = serde_json::to_value(article.without_score()).unwrap();
        assert!(value.get("score").is_none());
    }

    #[test]
    fn test_article_detail_flattens_article() {
        let detail: ArticleDetail = serde_json::from_value(json!({
            "item_id": "a1",
            "title": "T1",
            "pub_year": 2020,
            "publisher": "Nature",
            "authors": "A. Author",
            "description": "First paragraph.\n\nSecond paragraph.",
            "pub_date": "2020-03-01",
            "keywords": "ml, stats",
            "item_url": null
        }))
        .unwrap();

        assert_eq!(detail.article.item_id, "a1");
        assert_eq!(detail.item_url, "");
        assert_eq!(
            detail.paragraphs().collect::<Vec<_>>(),
            vec!["First paragraph.", "Second paragraph."]
        );
    }

    #[test]
    fn test_detail_missing_description_is_rejected() {
        let result: std::result::Result<ArticleDetail, _> = serde_json::from_value(json!({
            "item_id": "a1",
            "title": "T1",
            "pub_year": 2020
        }));
        assert!(result.is_err());
    }
}
