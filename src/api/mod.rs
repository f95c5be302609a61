//! API layer - routers, handlers, middleware, and shared types

pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod creator;
pub mod health;
pub mod middleware;
pub mod rewards;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, create_router_with_state};
pub use state::AppState;
