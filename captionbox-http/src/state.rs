use std::sync::Arc;

use captionbox::{CaptionSource, RetrievalFacade, Tools};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state of every handler.
pub struct AppState<S> {
    pub(crate) facade: Arc<RetrievalFacade<S>>,
    pub(crate) tools: Tools<S>,
    pub(crate) prometheus: Option<PrometheusHandle>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            facade: self.facade.clone(),
            tools: self.tools.clone(),
            prometheus: self.prometheus.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: CaptionSource,
{
    pub fn new(facade: Arc<RetrievalFacade<S>>) -> Self {
        Self {
            tools: Tools::new(facade.clone()),
            facade,
            prometheus: None,
        }
    }

    /// Serves `/metrics` from `handle`. Without one the endpoint answers 404.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn facade(&self) -> &Arc<RetrievalFacade<S>> {
        &self.facade
    }
}
