#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use gateway::analysis::scoring_client::{ScoringError, ScoringService};
use gateway::analysis::AnalysisRequest;
use gateway::config::Config;
use gateway::extraction::ExtractorRegistry;
use gateway::routes::build_router;
use gateway::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL on which nothing is listening.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub struct TestGateway {
    pub base_url: String,
    pub upload_dir: TempDir,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn staged_files(&self) -> usize {
        count_files(self.upload_dir.path())
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: Some(1024 * 1024),
        extraction_timeout: Duration::from_secs(10),
        scoring_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

pub async fn spawn_gateway(scoring: Arc<dyn ScoringService>) -> TestGateway {
    spawn_gateway_with(scoring, |_| {}).await
}

pub async fn spawn_gateway_with(
    scoring: Arc<dyn ScoringService>,
    tweak: impl FnOnce(&mut Config),
) -> TestGateway {
    spawn_gateway_with_registry(ExtractorRegistry::with_defaults(), scoring, tweak).await
}

pub async fn spawn_gateway_with_registry(
    registry: ExtractorRegistry,
    scoring: Arc<dyn ScoringService>,
    tweak: impl FnOnce(&mut Config),
) -> TestGateway {
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(upload_dir.path());
    tweak(&mut config);
    let state = AppState::new(config, registry, scoring);
    let base_url = serve(build_router(state)).await;
    TestGateway {
        base_url,
        upload_dir,
    }
}

/// Scoring backend that records calls and returns a fixed payload.
#[derive(Default)]
pub struct CountingScoring {
    pub calls: AtomicUsize,
}

impl CountingScoring {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringService for CountingScoring {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(sample_result(&request.jd_text))
    }
}

pub fn sample_result(jd_text: &str) -> Value {
    json!({
        "resume_keywords": ["python", "developer"],
        "jd_keywords": ["python", "kubernetes"],
        "missing_skills": ["kubernetes"],
        "score": 57.73,
        "suggestions": [
            format!("Consider adding/emphasizing these keywords from the JD: kubernetes ({} chars of JD)", jd_text.len())
        ]
    })
}

/// Minimal single-page PDF showing `text` in Helvetica, with a correct xref table.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let content = if text.is_empty() {
        String::new()
    } else {
        format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET")
    };
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

/// DOCX archive whose body holds one paragraph per entry.
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn resume_form(filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().part(
        "resume",
        reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string()),
    )
}
