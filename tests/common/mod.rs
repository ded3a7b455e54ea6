//! Shared test utilities and fake collaborators.

#![allow(dead_code)]

pub mod mock_backend;

use oceanid::api::{
    ApiError, ClassificationPayload, ClassificationService, HistoryRecord, HistoryService,
    ImageUpload, ModelId,
};
use oceanid::config::{Config, UiConfig};
use oceanid::session::Session;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

/// A call the fake service received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Classify { file_name: String, model: ModelId },
    FetchHistory,
    Delete(u64),
}

/// In-process stand-in for the classification service.
///
/// Results are consumed in FIFO order per operation; an empty queue yields
/// a successful default.
#[derive(Default)]
pub struct FakeService {
    calls: Mutex<Vec<Call>>,
    classify_results: Mutex<VecDeque<Result<ClassificationPayload, ApiError>>>,
    history_results: Mutex<VecDeque<Result<Vec<HistoryRecord>, ApiError>>>,
    delete_results: Mutex<VecDeque<Result<(), ApiError>>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_classify(&self, result: Result<ClassificationPayload, ApiError>) {
        self.classify_results.lock().push_back(result);
    }

    pub fn push_history(&self, result: Result<Vec<HistoryRecord>, ApiError>) {
        self.history_results.lock().push_back(result);
    }

    pub fn push_delete(&self, result: Result<(), ApiError>) {
        self.delete_results.lock().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl ClassificationService for FakeService {
    async fn classify(
        &self,
        image: &ImageUpload,
        model: ModelId,
    ) -> Result<ClassificationPayload, ApiError> {
        self.calls.lock().push(Call::Classify {
            file_name: image.file_name.clone(),
            model,
        });
        let next = self.classify_results.lock().pop_front();
        next.unwrap_or_else(|| Ok(payload(1, "Clownfish", model)))
    }
}

impl HistoryService for FakeService {
    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        self.calls.lock().push(Call::FetchHistory);
        let next = self.history_results.lock().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn delete_record(&self, image_id: u64) -> Result<(), ApiError> {
        self.calls.lock().push(Call::Delete(image_id));
        let next = self.delete_results.lock().pop_front();
        next.unwrap_or(Ok(()))
    }
}

pub fn payload(image_id: u64, class_name: &str, model: ModelId) -> ClassificationPayload {
    ClassificationPayload {
        image_id,
        class_name: class_name.to_string(),
        confidence: "97.12%".to_string(),
        model_used: model.display_name().to_string(),
        summary: None,
        url: None,
    }
}

pub fn record(image_id: u64, class_name: &str) -> HistoryRecord {
    HistoryRecord {
        image_id,
        class_name: Some(class_name.to_string()),
        confidence: Some("88.00%".to_string()),
        image: Some(format!("uploads/{}.png", image_id)),
        model_used: Some("ResNet50".to_string()),
        summary: None,
        url: None,
        created_at: Some("2026-10-01T12:00:00Z".to_string()),
    }
}

pub fn upstream(status: u16, message: &str) -> ApiError {
    ApiError::Upstream {
        status,
        message: message.to_string(),
    }
}

pub fn png_upload(file_name: &str) -> ImageUpload {
    ImageUpload::from_bytes(file_name, PNG_MAGIC.to_vec()).expect("png magic is recognised")
}

/// Write a small PNG-signed file and return its path.
pub fn png_file(dir: &TempDir, file_name: &str) -> PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, PNG_MAGIC).expect("Failed to write image");
    path
}

pub fn ui_config(status_ttl: Duration) -> UiConfig {
    UiConfig {
        status_ttl_ms: status_ttl.as_millis() as u64,
        ..UiConfig::default()
    }
}

pub fn session(status_ttl: Duration) -> Session {
    Session::from_config(&ui_config(status_ttl), None)
}

/// Write `content` as `config.toml` in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Config pointing at `base_url` with short timeouts.
pub fn service_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.service.base_url = base_url.to_string();
    config.service.timeout_seconds = 5;
    config.service.connect_timeout_seconds = 2;
    config
}
