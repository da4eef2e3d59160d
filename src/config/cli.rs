use crate::config::plan_config::PlanConfig;
use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "debtclear")]
#[command(about = "Compare debt payoff strategies and export your plan")]
pub struct CliConfig {
    /// Path to the TOML plan file with your debts and budget
    #[arg(short, long, default_value = "debtclear.toml")]
    pub plan: String,

    /// Override the optimizer backend URL
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Override the monthly budget from the plan file
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Override the directory exports are saved to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Skip the PDF export
    #[arg(long)]
    pub no_pdf: bool,

    /// Also save the chart series as CSV
    #[arg(long)]
    pub chart_csv: bool,

    /// Also save the raw optimizer response as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the month-by-month payment schedule
    #[arg(long)]
    pub schedule: bool,

    /// Email the summary to this address
    #[arg(long, requires = "name")]
    pub email: Option<String>,

    /// Name used to greet the email recipient
    #[arg(long)]
    pub name: Option<String>,

    /// Only check whether the backend is up
    #[arg(long)]
    pub health: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub log_json: bool,
}

impl CliConfig {
    /// Command-line flags win over the plan file.
    pub fn apply_overrides(&self, plan: &mut PlanConfig) {
        if let Some(url) = &self.backend_url {
            tracing::info!("🔧 Backend URL overridden to: {}", url);
            plan.backend.url = url.clone();
        }
        if let Some(budget) = self.budget {
            tracing::info!("🔧 Monthly budget overridden to: £{:.2}", budget);
            plan.budget.monthly = budget;
        }
        if let Some(path) = &self.output_path {
            plan.export.output_path = path.clone();
        }
        if self.no_pdf {
            plan.export.pdf = false;
        }
        plan.export.chart_csv |= self.chart_csv;
        plan.export.json |= self.json;
    }
}
