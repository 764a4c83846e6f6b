//! Storage upload configuration for browser clients.
//!
//! Browsers that upload straight to the storage provider first fetch the
//! public settings, then ask the server to sign the exact parameters they
//! will send. The API secret never leaves the server.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/config` | No | Public upload settings |
//! | POST | `/config` | No | Signed parameters for a direct upload |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::UploadConfigService;
