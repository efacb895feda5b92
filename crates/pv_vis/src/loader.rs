use async_trait::async_trait;
use pv_client::ApiClient;
use pv_core::{Error, ItemInfo, LoadingState, PlotPoint, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use crate::plot::ScatterPlot;

pub const ITEM_INFO_FILE: &str = "item_info.json";
pub const XYC_FILE: &str = "xyc.json";

/// Where the two scatterplot resources come from.
#[async_trait]
pub trait PlotSource: Send + Sync {
    async fn item_info(&self) -> Result<HashMap<String, ItemInfo>>;
    async fn points(&self) -> Result<Vec<PlotPoint>>;
}

#[async_trait]
impl PlotSource for ApiClient {
    async fn item_info(&self) -> Result<HashMap<String, ItemInfo>> {
        ApiClient::item_info(self).await
    }

    async fn points(&self) -> Result<Vec<PlotPoint>> {
        self.xyc().await
    }
}

/// Reads `item_info.json` and `xyc.json` from a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let raw = tokio::fs::read(&path).await?;
        serde_json::from_slice(&raw).map_err(|e| Error::Shape(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl PlotSource for FileSource {
    async fn item_info(&self) -> Result<HashMap<String, ItemInfo>> {
        self.read(ITEM_INFO_FILE).await
    }

    async fn points(&self) -> Result<Vec<PlotPoint>> {
        self.read(XYC_FILE).await
    }
}

struct Resource<T> {
    value: Option<Arc<T>>,
    state: LoadingState,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            value: None,
            state: LoadingState::Idle,
        }
    }
}

impl<T> Resource<T> {
    /// Claim the load if nobody else holds it and the value is still missing.
    fn claim(&mut self) -> bool {
        if self.value.is_some() || self.state == LoadingState::Loading {
            return false;
        }
        self.state = LoadingState::Loading;
        true
    }

    /// Store the outcome of a claimed load, handing back the error if it failed.
    fn finish(&mut self, result: Result<T>) -> Option<Error> {
        match result {
            Ok(value) => {
                self.value = Some(Arc::new(value));
                self.state = LoadingState::Loaded;
                None
            }
            Err(e) => {
                self.state = LoadingState::Error;
                Some(e)
            }
        }
    }
}

#[derive(Default)]
struct LoaderState {
    item_info: Resource<HashMap<String, ItemInfo>>,
    points: Resource<Vec<PlotPoint>>,
}

/// Loads both scatterplot resources at most once and builds the plot when both are in.
///
/// A call made while a load is already running does not start a second one and returns
/// `Ok(None)`; the call that owns the load returns the plot. A failed load leaves the
/// resource in `LoadingState::Error` and the next call retries it.
pub struct PlotLoader<S: PlotSource> {
    source: S,
    state: Mutex<LoaderState>,
}

impl<S: PlotSource> PlotLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(LoaderState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn item_info_state(&self) -> LoadingState {
        self.lock().item_info.state
    }

    pub fn points_state(&self) -> LoadingState {
        self.lock().points.state
    }

    pub async fn display(&self, width: f64, height: f64) -> Result<Option<ScatterPlot>> {
        let (load_info, load_points) = {
            let mut state = self.lock();
            (state.item_info.claim(), state.points.claim())
        };

        let (info_result, points_result) = tokio::join!(
            async {
                if load_info {
                    debug!("Loading item info");
                    Some(self.source.item_info().await)
                } else {
                    None
                }
            },
            async {
                if load_points {
                    debug!("Loading layout points");
                    Some(self.source.points().await)
                } else {
                    None
                }
            }
        );

        let first_error = {
            let mut state = self.lock();
            let info_error = info_result.and_then(|result| state.item_info.finish(result));
            let points_error = points_result.and_then(|result| state.points.finish(result));
            info_error.or(points_error)
        };
        if let Some(e) = first_error {
            warn!("Failed to load scatterplot data: {}", e);
            return Err(e);
        }

        let state = self.lock();
        match (&state.item_info.value, &state.points.value) {
            (Some(info), Some(points)) => {
                info!("🗺️ Rendering {} points", points.len());
                Ok(Some(ScatterPlot::new(points, info.clone(), width, height)))
            }
            _ => Ok(None),
        }
    }
}
