//! ferry-verify CLI - checksum verification of migrated tables.

use clap::{Parser, Subcommand};
use ferry_verify::{
    ChecksumTableVerifier, Config, MysqlStore, StoreRole, VerificationReport, Verifier,
    VerifyContext, VerifyError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Exit code when verification ran and found mismatched tables.
const EXIT_MISMATCH: u8 = 2;

#[derive(Parser)]
#[command(name = "ferry-verify")]
#[command(about = "Verify that migrated tables match between source and target")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare table checksums between source and target
    Verify {
        /// Override the configured tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tables: Option<Vec<String>>,

        /// Stop waiting after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Test database connections
    HealthCheck,
}

/// How a successful invocation ended.
enum Outcome {
    Consistent,
    Mismatched,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(Outcome::Consistent) => ExitCode::SUCCESS,
        Ok(Outcome::Mismatched) => ExitCode::from(EXIT_MISMATCH),
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<Outcome, VerifyError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Verify { tables, timeout } => {
            if let Some(tables) = tables {
                config.verify.tables = tables;
            }
            if timeout.is_some() {
                config.verify.timeout_secs = timeout;
            }
            config.normalize();
            config.validate()?;

            let cancel_token = setup_signal_handler();
            let (report, verdict) = run_verification(&config, cancel_token).await?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                print_report(&report);
            }

            // An aborted run has no mismatches, so check the error first
            match verdict? {
                true => Ok(Outcome::Consistent),
                false => Ok(Outcome::Mismatched),
            }
        }

        Commands::HealthCheck => health_check(&config, cli.output_json).await,
    }
}

/// Connect both stores, run the checksum verifier and wait for its report
/// and verdict.
async fn run_verification(
    config: &Config,
    cancel: CancellationToken,
) -> Result<(VerificationReport, Result<bool, VerifyError>), VerifyError> {
    let verifier = ChecksumTableVerifier::new(config.verify.tables.clone());
    info!(
        "Verifying {} tables {:?} (run {})",
        verifier.tables().len(),
        verifier.tables(),
        verifier.run_id()
    );

    let source = MysqlStore::connect(&config.source, StoreRole::Source).await?;
    let target = MysqlStore::connect(&config.target, StoreRole::Target).await?;
    verifier.start(VerifyContext::new(Arc::new(source), Arc::new(target)))?;

    wait_for(&verifier, config.verify.timeout_secs, cancel).await?;

    let report = verifier.report().ok_or(VerifyError::NotFinished)?;
    Ok((report, verifier.verdict()))
}

/// Wait for the verifier, giving up on timeout or cancellation.
///
/// Giving up does not stop the background run.
async fn wait_for(
    verifier: &dyn Verifier,
    timeout_secs: Option<u64>,
    cancel: CancellationToken,
) -> Result<(), VerifyError> {
    let wait = async {
        match timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), verifier.wait())
                .await
                .map_err(|_| VerifyError::Timeout(secs)),
            None => {
                verifier.wait().await;
                Ok(())
            }
        }
    };

    tokio::select! {
        result = wait => result,
        _ = cancel.cancelled() => Err(VerifyError::Cancelled),
    }
}

fn print_report(report: &VerificationReport) {
    let status = match (&report.error, report.consistent) {
        (Some(_), _) => "Verification failed!",
        (None, true) => "Verification passed!",
        (None, false) => "Verification found mismatches!",
    };
    println!("\n{}", status);
    println!("  Run ID: {}", report.run_id);
    println!("  Duration: {:.2}s", report.duration_ms as f64 / 1000.0);
    println!("  Tables checked: {}", report.tables.len());
    if !report.mismatched_tables.is_empty() {
        println!("  Mismatched tables: {:?}", report.mismatched_tables);
    }
    if let Some(ref err) = report.error {
        println!("  Error: {}", err);
    }
}

async fn health_check(config: &Config, output_json: bool) -> Result<Outcome, VerifyError> {
    let (source_ok, source_ms, source_err) = probe(&config.source, StoreRole::Source).await;
    let (target_ok, target_ms, target_err) = probe(&config.target, StoreRole::Target).await;
    let healthy = source_ok && target_ok;

    if output_json {
        let result = serde_json::json!({
            "source_connected": source_ok,
            "source_latency_ms": source_ms,
            "source_error": source_err,
            "target_connected": target_ok,
            "target_latency_ms": target_ms,
            "target_error": target_err,
            "healthy": healthy,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Health Check Results:");
        println!(
            "  Source (MySQL): {} ({}ms)",
            if source_ok { "OK" } else { "FAILED" },
            source_ms
        );
        if let Some(ref err) = source_err {
            println!("    Error: {}", err);
        }
        println!(
            "  Target (MySQL): {} ({}ms)",
            if target_ok { "OK" } else { "FAILED" },
            target_ms
        );
        if let Some(ref err) = target_err {
            println!("    Error: {}", err);
        }
        println!(
            "\n  Overall: {}",
            if healthy { "HEALTHY" } else { "UNHEALTHY" }
        );
    }

    if !healthy {
        return Err(VerifyError::Config("Health check failed".to_string()));
    }
    Ok(Outcome::Consistent)
}

/// Connect to one store, returning (ok, latency, error).
///
/// `MysqlStore::connect` pings before returning.
async fn probe(
    config: &ferry_verify::StoreConfig,
    role: StoreRole,
) -> (bool, u64, Option<String>) {
    let start = Instant::now();
    let result = MysqlStore::connect(config, role).await.map(|_| ());
    let elapsed = start.elapsed().as_millis() as u64;
    match result {
        Ok(()) => (true, elapsed, None),
        Err(e) => (false, elapsed, Some(e.to_string())),
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Setup signal handlers so an interrupted wait exits cleanly.
/// Handles both SIGINT (Ctrl-C) and SIGTERM.
/// Returns a CancellationToken that will be cancelled when a signal is received.
#[cfg(unix)]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();

    for (kind, name) in [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
    ] {
        let token = cancel_token.clone();
        match signal(kind) {
            Ok(mut stream) => {
                tokio::spawn(async move {
                    stream.recv().await;
                    eprintln!("\nReceived {}. Abandoning wait; the verification run is not stopped.", name);
                    token.cancel();
                });
            }
            Err(e) => warn!("Failed to install {} handler: {}", name, e),
        }
    }

    cancel_token
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Abandoning wait...");
            token.cancel();
        }
    });

    cancel_token
}
