pub mod error;
pub mod history;
pub mod identity;
pub mod storage;
pub mod types;

pub use error::Error;
pub use history::HistoryStore;
pub use storage::{CookieJar, KeyValueStore};
pub use types::{Article, ArticleDetail, ItemInfo, LoadingState, PlotPoint, RatingRequest, SimilarityQuery};

pub type Result<T> = std::result::Result<T, Error>;
