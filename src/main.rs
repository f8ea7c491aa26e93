//! Adaptive Rollout CLI
//!
//! Runs a synthetic smoke rollout for one or more domains.

use adaptive_rollout::{
    cancel_pair, run_smoke, Domain, EnvSnapshot, RolloutSettings, RunScheduler, Tier, Validate,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <short|long> <domain>...", args[0]);
        eprintln!("\nRuns a synthetic rollout for each domain and summarizes the outcome.");
        eprintln!("\nEnvironment variables:");
        eprintln!("  PLAN_ENABLED=0|1       Allow plan generation (default: 1)");
        eprintln!("  OPEN_ENABLED_LONG=0|1  Allow OPEN phase for long runs (default: 1)");
        eprintln!("  CAP_SHORT=<n>          Step cap for short runs (default: 104)");
        eprintln!("  CAP_LONG=<n>           Step cap for long runs (default: 160)");
        eprintln!("  STAGING_PROFILE=0|1    Print one summary line per domain (default: 0)");
        std::process::exit(1);
    }

    let tier: Tier = match args[1].parse() {
        Ok(tier) => tier,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let domains: Vec<Domain> = args[2..].iter().map(|d| Domain::from(d.as_str())).collect();

    // Environment is read once; everything downstream uses the snapshot.
    let settings = RolloutSettings::from_env(&EnvSnapshot::from_process());
    match settings.validate().into_result() {
        Ok(warnings) => {
            for warning in warnings {
                tracing::warn!("{}", warning);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let (cancel_handle, cancel) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling runs");
            cancel_handle.cancel();
        }
    });

    tracing::info!(tier = %tier, domains = domains.len(), "starting rollout");

    let report = match run_smoke(RunScheduler::new(settings), tier, &domains, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Rollout failed: {}", e);
            std::process::exit(1);
        }
    };

    if settings.flags.staging_profile {
        println!("{}", report);
    } else {
        for line in report.summary_lines() {
            tracing::info!("{}", line);
        }
    }

    if report.has_warnings() {
        std::process::exit(1);
    }
}
