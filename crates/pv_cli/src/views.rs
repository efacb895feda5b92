use pv_core::{Article, ArticleDetail};

const DONUT_CELLS: usize = 10;

/// What an article list is showing; decides its header and whether scores are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Similar,
    Compare,
    Recommendation,
}

impl ListMode {
    pub fn header(&self) -> &'static str {
        match self {
            ListMode::Similar => "Similar articles",
            ListMode::Compare => "Search results",
            ListMode::Recommendation => "Recommended articles",
        }
    }

    fn shows_score(&self) -> bool {
        !matches!(self, ListMode::Recommendation)
    }
}

/// Text stand-in for the similarity donut, e.g. `██████░░░░  62%`.
pub fn render_score(score: Option<f64>) -> String {
    match score {
        Some(score) => {
            let clamped = score.clamp(0.0, 100.0);
            let filled = ((clamped / 100.0) * DONUT_CELLS as f64).round() as usize;
            format!(
                "{}{} {:>3.0}%",
                "█".repeat(filled),
                "░".repeat(DONUT_CELLS - filled),
                clamped
            )
        }
        None => format!("{} {:>4}", "░".repeat(DONUT_CELLS), "n/a"),
    }
}

pub fn render_search_results(results: &[Article]) -> String {
    if results.is_empty() {
        return "No articles found.\n".to_string();
    }
    results
        .iter()
        .map(|article| format!("{}\n    {}  [{}]\n", article.title, article.byline(), article.item_id))
        .collect()
}

pub fn render_article(detail: &ArticleDetail) -> String {
    let article = &detail.article;
    let mut out = format!(
        "{}\n{}, {}\n{}\n\n",
        article.title, article.publisher, article.pub_year, article.authors
    );
    for paragraph in detail.paragraphs() {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }
    if !detail.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", detail.keywords));
    }
    if !detail.item_url.is_empty() {
        out.push_str(&format!("View original article: {}\n", detail.item_url));
    }
    out
}

pub fn render_article_list(results: &[Article], mode: ListMode) -> String {
    let mut out = format!("== {} ==\n", mode.header());
    if results.is_empty() {
        out.push_str("No articles found.\n");
        return out;
    }
    for article in results {
        if mode.shows_score() {
            out.push_str(&format!("{}  ", render_score(article.score)));
        }
        out.push_str(&format!(
            "{}\n    {}  [{}]\n",
            article.title,
            article.byline(),
            article.item_id
        ));
    }
    out
}

pub fn render_history(items: &[Article]) -> String {
    if items.is_empty() {
        return "No articles viewed yet.\n".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!("{:>3}. {}\n     {}  [{}]\n", i + 1, article.title, article.byline(), article.item_id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, score: Option<f64>) -> Article {
        Article {
            item_id: id.to_string(),
            title: format!("Title {}", id),
            pub_year: 2018,
            publisher: "Journal".to_string(),
            authors: "A. Author, B. Author".to_string(),
            score,
        }
    }

    #[test]
    fn test_render_score() {
        assert_eq!(render_score(Some(62.4)), "██████░░░░  62%");
        assert_eq!(render_score(Some(140.0)), "██████████ 100%");
        assert_eq!(render_score(None), "░░░░░░░░░░  n/a");
    }

    #[test]
    fn test_search_results() {
        let out = render_search_results(&[article("a", None)]);
        assert_eq!(out, "Title a\n    2018, A. Author, B. Author  [a]\n");
        assert_eq!(render_search_results(&[]), "No articles found.\n");
    }

    #[test]
    fn test_recommendations_hide_scores() {
        let items = [article("a", Some(80.0))];
        let similar = render_article_list(&items, ListMode::Similar);
        let recommended = render_article_list(&items, ListMode::Recommendation);

        assert!(similar.starts_with("== Similar articles ==\n"));
        assert!(similar.contains(" 80%"));
        assert!(recommended.starts_with("== Recommended articles ==\n"));
        assert!(!recommended.contains('%'));
    }

    #[test]
    fn test_render_article() {
        let detail = ArticleDetail {
            article: article("a", None),
            description: "First.\nSecond.".to_string(),
            pub_date: "2018-01-01".to_string(),
            keywords: String::new(),
            item_url: "https://example.org/a".to_string(),
        };
        let out = render_article(&detail);
        assert!(out.starts_with("Title a\nJournal, 2018\nA. Author, B. Author\n\nFirst.\n\nSecond.\n\n"));
        assert!(out.ends_with("View original article: https://example.org/a\n"));
        assert!(!out.contains("Keywords"));
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No articles viewed yet.\n");
        let out = render_history(&[article("b", None), article("a", None)]);
        assert!(out.starts_with("  1. Title b\n"));
        assert!(out.contains("  2. Title a\n"));
    }
}
