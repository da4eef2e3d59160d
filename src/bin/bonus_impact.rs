use anyhow::Context;
use clap::Parser;
use debtclear::config::PlanConfig;
use debtclear::domain::ports::ConfigProvider;
use debtclear::render::table;
use debtclear::utils::{logger, validation::Validate};
use debtclear::{LocalStorage, OptimizerClient, PlanEngine};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "bonus-impact")]
#[command(about = "See how a one-off extra payment changes your debt-free date")]
struct Args {
    /// Path to the TOML plan file
    #[arg(short, long, default_value = "debtclear.toml")]
    plan: String,

    /// One-off extra payment, e.g. a work bonus
    #[arg(short, long)]
    extra: Decimal,

    /// Override the optimizer backend URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let mut plan = PlanConfig::from_file(&args.plan)
        .with_context(|| format!("Failed to load plan file '{}'", args.plan))?;
    if let Some(url) = &args.backend_url {
        plan.backend.url = url.clone();
    }
    plan.validate().context("Plan file is invalid")?;

    let form = plan.to_form()?;
    let client = OptimizerClient::from_config(&plan)?;
    let engine = PlanEngine::new(client, LocalStorage::new(plan.output_path()));

    match engine.bonus_impact(&form, args.extra).await {
        Ok(impact) => {
            println!("{}", table::render_bonus_impact(args.extra, &impact));
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Bonus impact failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            Err(e.into())
        }
    }
}
