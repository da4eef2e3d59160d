pub mod busy;
pub mod planner;

pub use crate::domain::model::{Debt, DebtType, OptimizationResult};
pub use crate::domain::ports::{ConfigProvider, Mailer, OptimizerApi, Storage};
pub use crate::utils::error::Result;
