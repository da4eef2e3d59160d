use clap::Parser;
use debtclear::config::PlanConfig;
use debtclear::domain::ports::ConfigProvider;
use debtclear::render::{format_currency, table};
use debtclear::utils::error::{DebtClearError, ErrorSeverity};
use debtclear::utils::{logger, validation::Validate};
use debtclear::{CliConfig, EmailJsMailer, LocalStorage, OptimizerClient, PlanEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = CliConfig::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting DebtClear");
    tracing::debug!("CLI config: {:?}", args);

    if let Err(e) = run(&args).await {
        report(&e);
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn report(e: &DebtClearError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

async fn run(args: &CliConfig) -> debtclear::Result<()> {
    tracing::info!("📁 Loading plan from: {}", args.plan);
    let mut plan = PlanConfig::from_file(&args.plan)?;
    args.apply_overrides(&mut plan);
    plan.validate()?;

    let client = OptimizerClient::from_config(&plan)?;
    let storage = LocalStorage::new(plan.output_path());
    let mut engine = PlanEngine::new(client, storage);

    if args.health {
        let health = engine.check_backend().await?;
        println!("Backend: {} (ai: {})", health.status, health.ai);
        return Ok(());
    }

    if let Some(email) = &plan.email {
        engine = engine.with_mailer(Arc::new(EmailJsMailer::new(email.clone())));
    }

    let form = plan.to_form()?;
    println!(
        "Total debt {} across {} entries, budget {}/month\n",
        format_currency(form.total_balance()),
        form.debts().len(),
        format_currency(form.monthly_budget())
    );
    let outcome = engine.submit(&form).await?;
    let result = &outcome.result;
    let today = chrono::Local::now().date_naive();

    println!("{}", table::render_comparison(result));
    println!("{}", table::render_explanations(result));
    let scenarios = table::render_scenarios(result);
    if !scenarios.is_empty() {
        println!("Budget scenarios:\n{}", scenarios);
    }
    if args.schedule {
        println!("{}", table::render_schedule(result));
    }

    // Each export is independent: a failure is reported and the rest still run.
    if plan.export.pdf {
        match engine.export_pdf(&outcome, today).await {
            Ok(path) => println!("📄 PDF saved to: {}", path),
            Err(e) => report(&e),
        }
    }
    if plan.export.chart_csv {
        match engine.export_chart_csv(&outcome, today).await {
            Ok(path) => println!("📈 Chart data saved to: {}", path),
            Err(e) => report(&e),
        }
    }
    if plan.export.json {
        match engine.export_json(&outcome, today).await {
            Ok(path) => println!("🗂️ Result saved to: {}", path),
            Err(e) => report(&e),
        }
    }

    if let Some(email) = &args.email {
        let name = args.name.as_deref().unwrap_or_default();
        match engine.email_summary(&outcome, name, email, today).await {
            Ok(true) => println!("📧 Plan sent to {}", email),
            Ok(false) => eprintln!("❌ Failed to send email. Please try again."),
            Err(e) => report(&e),
        }
    }

    Ok(())
}
