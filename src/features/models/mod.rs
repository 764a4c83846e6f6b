//! Furniture 3D models: upload, lookup and view tracking.
//!
//! Uploaded `.glb`/`.gltf` files go to object storage; each file gets one
//! row in `models` holding its metadata and view counter.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/upload` | No | Upload a model file (multipart) |
//! | GET | `/model/{id}` | No | Get a model record |
//! | POST | `/model/{id}/view` | No | Record one view |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgModelRepository;
pub use routes::routes;
pub use services::{ModelUploadService, ModelViewService};
