//! Admin infrastructure - approval workflows

pub mod service;

pub use service::AdminService;
