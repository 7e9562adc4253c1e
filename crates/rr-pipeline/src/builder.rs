//! Fluent builder for constructing a [`RoutePipeline`].

use rr_core::RouteConfig;
use rr_label::{CsvFeatureSource, FeatureSource};
use rr_spatial::Router;

use crate::{
    Geocoder, GraphProvider, NoGeocoder, NoScorer, PipelineError, PipelineResult, RoutePipeline,
    RouteScorer,
};

/// Fluent builder for [`RoutePipeline<R>`].
///
/// # Required inputs
///
/// - [`RouteConfig`] — validated in [`build`](Self::build)
/// - `R: Router` — the routing algorithm (e.g. [`rr_spatial::DijkstraRouter`])
/// - a [`GraphProvider`] via [`graph_provider`](Self::graph_provider)
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                  |
/// |------------------------|------------------------------------------|
/// | `.feature_source(s)`   | No features (every summary is zero)      |
/// | `.geocoder(g)`         | [`NoGeocoder`] (addresses never resolve) |
/// | `.scorer(s)`           | [`NoScorer`] (`recommend` is null)       |
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new(config, DijkstraRouter)
///     .graph_provider(CsvGraphProvider::new(nodes, edges))
///     .feature_source(CsvFeatureSource::from_path(&features)?)
///     .geocoder(TableGeocoder::from_path(&addresses)?)
///     .build()?;
/// ```
pub struct PipelineBuilder<R: Router> {
    config:   RouteConfig,
    router:   R,
    graphs:   Option<Box<dyn GraphProvider>>,
    features: Option<Box<dyn FeatureSource>>,
    geocoder: Option<Box<dyn Geocoder>>,
    scorer:   Option<Box<dyn RouteScorer>>,
}

impl<R: Router> PipelineBuilder<R> {
    /// Create a builder with all required inputs except the graph provider.
    pub fn new(config: RouteConfig, router: R) -> Self {
        Self {
            config,
            router,
            graphs:   None,
            features: None,
            geocoder: None,
            scorer:   None,
        }
    }

    pub fn graph_provider(mut self, provider: impl GraphProvider + 'static) -> Self {
        self.graphs = Some(Box::new(provider));
        self
    }

    pub fn feature_source(mut self, source: impl FeatureSource + 'static) -> Self {
        self.features = Some(Box::new(source));
        self
    }

    pub fn geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    pub fn scorer(mut self, scorer: impl RouteScorer + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    /// Validate the configuration and return a ready pipeline.
    pub fn build(self) -> PipelineResult<RoutePipeline<R>> {
        self.config.validate()?;

        let graphs = self
            .graphs
            .ok_or_else(|| PipelineError::Provider("no graph provider configured".into()))?;

        Ok(RoutePipeline {
            config:   self.config,
            router:   self.router,
            graphs,
            features: self.features.unwrap_or_else(|| Box::new(CsvFeatureSource::default())),
            geocoder: self.geocoder.unwrap_or_else(|| Box::new(NoGeocoder)),
            scorer:   self.scorer.unwrap_or_else(|| Box::new(NoScorer)),
        })
    }
}
