//! Observable loading/result state for a set of locations.

use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    model::CompleteWeather,
    retriever::{RetrieveError, WeatherRetriever},
};

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub is_loading: bool,
    pub data: Option<Arc<Vec<CompleteWeather>>>,
    /// Message of the last failed load, cleared by the next successful one.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct WeatherViewModel<R> {
    retriever: R,
    state: watch::Sender<ViewState>,
}

impl<R: WeatherRetriever + 'static> WeatherViewModel<R> {
    pub fn new(retriever: R) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self { retriever, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Fetch every location in order and publish the result.
    ///
    /// One failing location fails the batch: earlier data stays in place,
    /// the error is published and loading is cleared either way.
    pub async fn load<S: AsRef<str>>(&self, locations: &[S]) -> Result<(), RetrieveError> {
        tracing::info!(count = locations.len(), "loading weather data");
        self.state.send_modify(|s| s.is_loading = true);

        match self.fetch_all(locations).await {
            Ok(data) => {
                self.state.send_modify(|s| {
                    s.data = Some(Arc::new(data));
                    s.error = None;
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather load failed");
                self.state.send_modify(|s| {
                    s.error = Some(err.to_string());
                    s.is_loading = false;
                });
                Err(err)
            }
        }
    }

    /// Start [`WeatherViewModel::load`] on the runtime and return at once.
    pub fn spawn_load(self: &Arc<Self>, locations: Vec<String>) -> JoinHandle<Result<(), RetrieveError>> {
        let model = Arc::clone(self);
        tokio::spawn(async move { model.load(&locations).await })
    }

    async fn fetch_all<S: AsRef<str>>(
        &self,
        locations: &[S],
    ) -> Result<Vec<CompleteWeather>, RetrieveError> {
        let mut data = Vec::with_capacity(locations.len());
        for location in locations {
            data.push(self.retriever.weather_for_location(location.as_ref()).await?);
        }
        Ok(data)
    }
}
