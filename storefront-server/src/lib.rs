//! Storefront API server
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/      # config, state, server
//! ├── auth/      # JWT service, middleware, extractor
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # embedded SurrealDB, models, repositories
//! ├── orders/    # order processor (stock reconciliation)
//! ├── services/  # image store
//! └── utils/     # error type, logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderProcessor;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
