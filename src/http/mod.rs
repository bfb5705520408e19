//! HTTP API server and browser UI
//!
//! This module serves the converter to the browser:
//! - GET / - Conversion page (static files from the assets directory)
//! - GET /api/validate?url= - Check a URL without network access
//! - POST /api/convert - Probe and convert a URL to MP3
//! - GET /downloads/:request_id - Download a converted file
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ConvertRequestBody, ErrorResponse, ValidateParams};
pub use routes::create_router;
pub use state::AppState;
