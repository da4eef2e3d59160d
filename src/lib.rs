pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::PlanConfig;

pub use adapters::{EmailJsConfig, EmailJsMailer, LocalStorage, OptimizerClient};
pub use core::planner::{PlanEngine, PlanOutcome};
pub use domain::form::{DebtField, DebtForm};
pub use domain::model::{Debt, DebtType, OptimizationResult, StrategyKind};
pub use utils::error::{DebtClearError, Result};
