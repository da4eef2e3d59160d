// Adapters layer: concrete implementations for the optimizer backend, the email provider and file saves.

pub mod email;
pub mod http;
pub mod storage;

pub use email::{EmailJsConfig, EmailJsMailer};
pub use http::OptimizerClient;
pub use storage::LocalStorage;
