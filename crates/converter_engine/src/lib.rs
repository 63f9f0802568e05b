//! Converter engine: backend API client, background IO and local files.
mod client;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{ApiSettings, ConversionApi, ProgressSink, ReqwestApi};
pub use engine::{EngineEvents, EngineHandle};
pub use filename::local_filename;
pub use persist::{ensure_dir, read_if_exists, AtomicFileWriter, PersistError};
pub use types::{ApiError, EngineEvent, FailureKind, RequestId, StatusResponse, VideoInfoResponse};
