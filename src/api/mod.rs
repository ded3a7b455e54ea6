//! Collaborators on the far side of the network boundary.
//!
//! The session core only sees the [`ClassificationService`] and
//! [`HistoryService`] traits; [`ApiClient`] implements both over HTTP.

mod client;
mod error;
mod image;
mod types;

use std::future::Future;

pub use client::ApiClient;
pub(crate) use client::header_value;
pub use error::ApiError;
pub use image::ImageUpload;
pub use types::{ClassificationPayload, HistoryRecord, ModelId, UnknownModel};

/// Uploads an image and returns the service's classification.
pub trait ClassificationService: Send + Sync {
    fn classify(
        &self,
        image: &ImageUpload,
        model: ModelId,
    ) -> impl Future<Output = Result<ClassificationPayload, ApiError>> + Send;
}

/// Reads and deletes past classification records.
pub trait HistoryService: Send + Sync {
    /// Records newest-first, in the order the service returns them.
    fn fetch_history(&self) -> impl Future<Output = Result<Vec<HistoryRecord>, ApiError>> + Send;

    fn delete_record(&self, image_id: u64) -> impl Future<Output = Result<(), ApiError>> + Send;
}
