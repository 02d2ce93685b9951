use crate::errors::RenderError;
use crate::reports::render::{
    CsvRenderer, FormatRenderer, HtmlRenderer, JsonRenderer, PdfRenderer, XlsxRenderer,
    XmlRenderer,
};
use common::model::report::ReportFormat;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from output format to the renderer that produces it.
#[derive(Default, Clone)]
pub struct RendererRegistry {
    renderers: HashMap<ReportFormat, Arc<dyn FormatRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All six built-in renderers; PDF uses the given font configuration.
    pub fn with_defaults(pdf: PdfRenderer) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonRenderer));
        registry.register(Arc::new(CsvRenderer));
        registry.register(Arc::new(XlsxRenderer));
        registry.register(Arc::new(pdf));
        registry.register(Arc::new(XmlRenderer));
        registry.register(Arc::new(HtmlRenderer));
        registry
    }

    /// Registers `renderer` under its own format, replacing any previous one.
    pub fn register(&mut self, renderer: Arc<dyn FormatRenderer>) -> &mut Self {
        self.renderers.insert(renderer.format(), renderer);
        self
    }

    pub fn get(&self, format: ReportFormat) -> Result<Arc<dyn FormatRenderer>, RenderError> {
        self.renderers
            .get(&format)
            .cloned()
            .ok_or(RenderError::MissingRenderer(format))
    }

    pub fn formats(&self) -> Vec<ReportFormat> {
        ReportFormat::ALL
            .iter()
            .copied()
            .filter(|f| self.renderers.contains_key(f))
            .collect()
    }
}
