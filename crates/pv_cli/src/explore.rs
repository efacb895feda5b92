use pv_core::{Article, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use crate::state::{AppState, RATING_DISLIKE, RATING_LIKE};
use crate::views::{self, ListMode};

/// One line typed at the explorer prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Open(String),
    Close,
    Like,
    Dislike,
    Compare(String),
    Recommended,
    History,
    ClearHistory,
    Help,
    Quit,
    Search(String),
    Empty,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match (command, rest) {
            ("", _) => Input::Empty,
            (":open", id) if !id.is_empty() => Input::Open(id.to_string()),
            (":close", "") => Input::Close,
            (":like", "") => Input::Like,
            (":dislike", "") => Input::Dislike,
            (":compare", text) => Input::Compare(text.to_string()),
            (":recommended", "") => Input::Recommended,
            (":history", "") => Input::History,
            (":history", "clear") => Input::ClearHistory,
            (":help", _) => Input::Help,
            (":quit", _) | (":q", _) => Input::Quit,
            _ => Input::Search(line.to_string()),
        }
    }
}

const HELP: &str = "\
Type to search titles and authors. Commands:
  :open <id>        show an article and its similar articles
  :close            close the current article
  :like / :dislike  rate the current article
  :compare <text>   find articles similar to a text
  :recommended      personal recommendations
  :history [clear]  recently viewed articles
  :quit
";

/// Interactive loop. Each search runs as its own task so typing never waits on the
/// backend; only the newest search is allowed to print.
pub async fn run(mut state: AppState) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<Article>>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", HELP);

    loop {
        tokio::select! {
            Some(results) = rx.recv() => {
                state.search_results_visible = true;
                state.list_mode = ListMode::Similar;
                print!("{}", views::render_search_results(&results));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle(&mut state, Input::parse(&line), &tx).await {
                    None => break,
                    Some(Ok(text)) => print!("{}", text),
                    Some(Err(e)) => eprintln!("Error: {}", e),
                }
            }
        }
    }
    Ok(())
}

/// Apply one input and return what to print; `None` ends the session.
async fn handle(
    state: &mut AppState,
    input: Input,
    tx: &mpsc::UnboundedSender<Vec<Article>>,
) -> Option<Result<String>> {
    let output = match input {
        Input::Empty => Ok(String::new()),
        Input::Quit => return None,
        Input::Help => Ok(HELP.to_string()),
        Input::Search(query) => {
            spawn_search(state, query, tx.clone());
            Ok(String::new())
        }
        Input::Open(id) => {
            let mode = state.list_mode;
            state.load_article(&id, mode).await
        }
        Input::Close => {
            state.close_article();
            Ok(String::new())
        }
        Input::Like => Ok(rate_current(state, RATING_LIKE).await),
        Input::Dislike => Ok(rate_current(state, RATING_DISLIKE).await),
        Input::Compare(text) => state.compare(&text, None).await,
        Input::Recommended => state.recommended(None).await,
        Input::History => Ok(state.history().await),
        Input::ClearHistory => state.clear_history().await.map(|_| String::new()),
    };
    Some(output)
}

async fn rate_current(state: &AppState, rating: f64) -> String {
    match state.current_article.as_deref() {
        Some(id) if state.rate(id, rating).await => "Thanks for rating.\n".to_string(),
        Some(_) => String::new(),
        None => "Open an article first.\n".to_string(),
    }
}

fn spawn_search(state: &AppState, query: String, tx: mpsc::UnboundedSender<Vec<Article>>) {
    let api = state.api.clone();
    let generation = state.generation.clone();
    let ticket = generation.begin();
    tokio::spawn(async move {
        match api.search(&query, None).await {
            Ok(results) => {
                if let Some(results) = generation.accept(ticket, results) {
                    let _ = tx.send(results);
                }
            }
            Err(e) => warn!("Search for {:?} failed: {}", query, e),
        }
        debug!("Search for {:?} finished", query);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::app_state;

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::parse("  "), Input::Empty);
        assert_eq!(Input::parse(":open 10.1000/xyz"), Input::Open("10.1000/xyz".to_string()));
        assert_eq!(Input::parse(":open"), Input::Search(":open".to_string()));
        assert_eq!(Input::parse(":history clear"), Input::ClearHistory);
        assert_eq!(Input::parse(":compare deep nets"), Input::Compare("deep nets".to_string()));
        assert_eq!(Input::parse("graph neural"), Input::Search("graph neural".to_string()));
        assert_eq!(Input::parse(":q"), Input::Quit);
    }

    #[tokio::test]
    async fn test_rating_needs_current_article() {
        let mut state = app_state().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let out = handle(&mut state, Input::Like, &tx).await.unwrap().unwrap();
        assert_eq!(out, "Open an article first.\n");
        assert!(handle(&mut state, Input::Quit, &tx).await.is_none());
    }

    #[tokio::test]
    async fn test_open_keeps_compare_list() {
        let mut state = app_state().await;
        let (tx, _rx) = mpsc::unbounded_channel();

        let compare = Input::parse(":compare deep nets");
        let listed = handle(&mut state, compare, &tx).await.unwrap().unwrap();
        assert!(listed.contains("== Search results =="));

        let opened = handle(&mut state, Input::parse(":open a1"), &tx).await.unwrap().unwrap();
        assert!(opened.starts_with("Title a1\n"));
        assert!(!opened.contains("Similar articles"));

        handle(&mut state, Input::Close, &tx).await.unwrap().unwrap();
        let opened = handle(&mut state, Input::parse(":open a1"), &tx).await.unwrap().unwrap();
        assert!(opened.contains("== Similar articles =="));
    }

    #[tokio::test]
    async fn test_open_keeps_recommendations() {
        let mut state = app_state().await;
        let (tx, _rx) = mpsc::unbounded_channel();

        handle(&mut state, Input::Recommended, &tx).await.unwrap().unwrap();
        let opened = handle(&mut state, Input::parse(":open a1"), &tx).await.unwrap().unwrap();
        assert!(!opened.contains("Similar articles"));
    }

    #[tokio::test]
    async fn test_only_latest_search_is_delivered() {
        let state = app_state().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_search(&state, "first".to_string(), tx.clone());
        spawn_search(&state, "second".to_string(), tx);

        let delivered = rx.recv().await.unwrap();
        assert_eq!(delivered[0].item_id, "s1");
        assert!(rx.recv().await.is_none());
    }
}
