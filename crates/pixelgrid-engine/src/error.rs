//! Engine error types.
//!
//! None of these are fatal to an animation session: the driver logs render
//! errors and keeps scheduling, and the shell turns storage/snapshot errors into
//! user-visible notices.

use thiserror::Error;

/// Why a frame was skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("unsupported pattern kind `{0}`")]
    UnknownPattern(String),

    #[error("active palette is empty")]
    EmptyPalette,

    #[error("invalid cell size {0}")]
    InvalidCellSize(f32),

    #[error("surface {width}x{height} is too small for a {cell}px grid")]
    EmptyGrid { width: f32, height: f32, cell: f32 },

    #[error("pattern panicked: {0}")]
    Panicked(String),
}

/// Encoding or decoding of persisted snapshots failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("snapshot is not a json object")]
    NotAnObject,

    #[error("not a png data url")]
    NotDataUrl,

    #[error("image is {found_w}x{found_h}, surface is {want_w}x{want_h}")]
    SizeMismatch { found_w: u32, found_h: u32, want_w: u32, want_h: u32 },

    #[error("surface does not support image snapshots")]
    Unsupported,
}

/// Key-value storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded writing `{key}`")]
    QuotaExceeded { key: String },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
