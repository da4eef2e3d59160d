use crate::adapters::email::EmailJsConfig;
use crate::core::ConfigProvider;
use crate::domain::form::{DebtField, DebtForm};
use crate::domain::model::{Debt, DebtType};
use crate::utils::error::{DebtClearError, Result};
use crate::utils::validation::{
    validate_non_negative, validate_path, validate_url, Validate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// A saved set of debts plus where to send and store things.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    pub budget: BudgetConfig,
    #[serde(default)]
    pub debts: Vec<DebtEntry>,
    #[serde(default)]
    pub export: ExportConfig,
    pub email: Option<EmailJsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub monthly: Decimal,
}

/// One `[[debts]]` table. `apr` falls back to the type's default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtEntry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub debt_type: DebtType,
    pub balance: Decimal,
    pub apr: Option<Decimal>,
    #[serde(default)]
    pub min_payment: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_true")]
    pub pdf: bool,
    #[serde(default)]
    pub chart_csv: bool,
    #[serde(default)]
    pub json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            pdf: true,
            chart_csv: false,
            json: false,
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_true() -> bool {
    true
}

impl PlanConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DebtClearError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DebtClearError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DebtClearError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_form(&self) -> Result<DebtForm> {
        let mut form = DebtForm::from_parts(Vec::new(), self.budget.monthly);
        for entry in &self.debts {
            let index = form.push_debt(Debt::default());
            form.update_debt(index, DebtField::Name(entry.name.clone()))?;
            form.select_type(index, entry.debt_type)?;
            form.update_debt(index, DebtField::Balance(entry.balance))?;
            form.update_debt(index, DebtField::MinPayment(entry.min_payment))?;
            if let Some(apr) = entry.apr {
                form.update_debt(index, DebtField::Apr(apr))?;
            }
        }
        Ok(form)
    }
}

impl Validate for PlanConfig {
    fn validate(&self) -> Result<()> {
        validate_url("backend.url", &self.backend.url)?;
        validate_path("export.output_path", &self.export.output_path)?;
        validate_non_negative("budget.monthly", self.budget.monthly)?;

        if self.backend.timeout_seconds == 0 {
            return Err(DebtClearError::InvalidConfigValueError {
                field: "backend.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        for (i, debt) in self.debts.iter().enumerate() {
            validate_non_negative(&format!("debts[{}].balance", i), debt.balance)?;
            validate_non_negative(&format!("debts[{}].min_payment", i), debt.min_payment)?;
            if let Some(apr) = debt.apr {
                validate_non_negative(&format!("debts[{}].apr", i), apr)?;
            }
        }

        if let Some(email) = &self.email {
            email.validate()?;
            for (field, value) in [
                ("email.service_id", &email.service_id),
                ("email.template_id", &email.template_id),
                ("email.public_key", &email.public_key),
            ] {
                if value.contains("${") {
                    return Err(DebtClearError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: value.clone(),
                        reason: "Environment variable is not set".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl ConfigProvider for PlanConfig {
    fn backend_url(&self) -> &str {
        &self.backend.url
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.backend.timeout_seconds
    }
}
