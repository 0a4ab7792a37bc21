use super::{ExtractError, Extractor};

/// Concatenated page text of a PDF document, via `pdf-extract`.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn label(&self) -> &'static str {
        "PDF"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_an_error_not_empty_text() {
        let result = PdfExtractor.extract(b"this is not a pdf at all");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_truncated_header_is_an_error() {
        let result = PdfExtractor.extract(b"%PDF-1.4\n1 0 obj\n<< /Type /Cat");
        assert!(result.is_err());
    }
}
