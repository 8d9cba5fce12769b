pub mod api;
pub mod config;
pub mod error;
pub mod service;

pub use api::router;
pub use service::LedgerService;
