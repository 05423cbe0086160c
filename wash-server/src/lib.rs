//! Wash Server - receipt and record service for wash bays
//!
//! # Module structure
//!
//! ```text
//! wash-server/src/
//! ├── core/          # configuration, state, HTTP server
//! ├── api/           # routes and handlers
//! ├── db/            # SQLite layer (authoritative)
//! ├── store/         # record store + redb mirror
//! ├── render/        # receipt HTML rendering
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod render;
pub mod store;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use store::{ArchiveOutcome, RecordScope, RecordStore, StoreError};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};
