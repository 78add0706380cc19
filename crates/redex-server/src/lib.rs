//! REDEX server - the cocktail bar site over axum and htmx.

pub mod config;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;
pub mod submissions;
pub mod visitor;

pub use config::Config;
pub use routes::create_router;
pub use state::{AppState, SharedStorage};
