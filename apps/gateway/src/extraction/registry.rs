//! Format tag → extractor lookup.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::docx::DocxExtractor;
use super::pdf::PdfExtractor;
use super::Extractor;

/// Lower-cased file extension without the leading dot, e.g. `pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatTag(String);

impl FormatTag {
    pub fn new(tag: &str) -> Self {
        Self(tag.trim_start_matches('.').to_lowercase())
    }

    /// Derives the tag from a declared filename. `None` when it has no extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of extraction adapters keyed by format tag.
/// Registration order is preserved and drives the "supported formats" message.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    entries: Vec<(FormatTag, Arc<dyn Extractor>)>,
}

impl ExtractorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The production registry: PDF and DOCX.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("pdf", Arc::new(PdfExtractor));
        registry.register("docx", Arc::new(DocxExtractor));
        registry
    }

    /// Maps `tag` to `extractor`, replacing any previous mapping for the tag.
    pub fn register(&mut self, tag: &str, extractor: Arc<dyn Extractor>) {
        let tag = FormatTag::new(tag);
        match self.entries.iter_mut().find(|(existing, _)| *existing == tag) {
            Some(slot) => slot.1 = extractor,
            None => self.entries.push((tag, extractor)),
        }
    }

    pub fn lookup(&self, tag: &FormatTag) -> Option<Arc<dyn Extractor>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == tag)
            .map(|(_, extractor)| Arc::clone(extractor))
    }

    /// Resolves the adapter for a declared filename, case-insensitively.
    pub fn resolve(&self, filename: &str) -> Option<Arc<dyn Extractor>> {
        FormatTag::from_filename(filename).and_then(|tag| self.lookup(&tag))
    }

    pub fn tags(&self) -> impl Iterator<Item = &FormatTag> {
        self.entries.iter().map(|(tag, _)| tag)
    }

    /// Distinct format labels in registration order.
    pub fn supported_labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for (_, extractor) in &self.entries {
            if !labels.contains(&extractor.label()) {
                labels.push(extractor.label());
            }
        }
        labels
    }

    /// User-facing rejection text for an unregistered format.
    pub fn unsupported_message(&self) -> String {
        format!(
            "Unsupported file type. Please upload {}.",
            self.supported_labels().join(" or ")
        )
    }
}
