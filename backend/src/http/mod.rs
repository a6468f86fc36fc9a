//! HTTP server exposing the exam schedule coordinator as a JSON API.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Bearer session -> RequestContext                       │
//! │  - JSON bodies, CORS, compression, error bodies           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (crate::services)                          │
//! │  - ExamScheduleCoordinator                                │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (crate::db)                             │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use session::{SessionResolver, StaticSessions};
pub use state::AppState;
