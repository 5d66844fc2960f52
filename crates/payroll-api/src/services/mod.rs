//! Request-lifecycle services shared by the upload handlers.

pub mod api_log;
pub mod batch_store;
pub mod in_flight;
pub mod lifecycle;
pub mod temp_upload;

pub use api_log::{ApiLog, FileApiLog};
pub use batch_store::BatchArtifactStore;
pub use in_flight::InFlightUploads;
pub use lifecycle::{Settlement, UploadLifecycle};
pub use temp_upload::TempUpload;
