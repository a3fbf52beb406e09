use anyhow::Context;
use clap::Parser;
use ml_salary_dashboard::utils::error::ErrorSeverity;
use ml_salary_dashboard::utils::{logger, validation::Validate};
use ml_salary_dashboard::{
    render_state, source_for, CliConfig, Dashboard, DashboardConfig, LoadState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting ml-salary-dashboard");
    tracing::debug!("CLI flags: {:?}", cli);

    let config = match DashboardConfig::from_cli(&cli).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "Configuration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };
    tracing::debug!("Effective configuration: {:?}", config);

    let source = source_for(&config.source, config.source_options());
    let dashboard = Dashboard::new(source, config.dashboard_options());
    let render_options = config.render_options();

    tracing::info!("Loading data from {}", config.source);
    dashboard.reload().await;

    let state = dashboard.state().await;
    let output = render_state(&state, &render_options).context("rendering summary")?;

    match state {
        LoadState::Failed(failure) => {
            eprintln!("{}", output);
            eprintln!("Suggestion: {}", failure.suggestion);
            std::process::exit(exit_code(failure.severity));
        }
        _ => println!("{}", output),
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
