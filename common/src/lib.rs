//! ID Card Registration Common Library
//!
//! CLIとWeb(WASM)で共有される型とコントローラ

pub mod types;
pub mod error;
pub mod warning;
pub mod payload;
pub mod endpoints;
pub mod backend;
pub mod capture;
pub mod lookup;
pub mod upload;
pub mod session;

pub use types::{ApiResponse, Category, FormMode, Record, StatusSelection, UploadResponse};
pub use error::{Error, Result};
pub use warning::WarningSurface;
pub use backend::{Backend, UploadReply};
pub use capture::{
    Camera, CaptureController, CaptureState, CaptureView, PhotoLoader, StreamConstraints,
    SurfaceSize, CANVAS_SIZE, STREAM_CONSTRAINTS,
};
pub use lookup::{FormModel, IdentifierOutcome, LookupController, LookupOutcome};
pub use upload::{prepare_upload, submit_upload, UploadFile};
pub use session::{FormSession, Submission};
