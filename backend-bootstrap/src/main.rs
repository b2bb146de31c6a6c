use anyhow::Result;
use clap::Parser;

use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "leakwatch-backend")]
#[command(about = "Leakwatch Backend Server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("LEAKWATCH_CONFIG", config);
    }

    // Config is loaded before tracing so `log_dir` can route the subscriber.
    let config = AppConfig::load().await?;
    let _guard = init_tracing(config.log_dir.as_deref());
    tracing::info!(
        bind_addr = %config.bind_addr,
        upload_dir = %config.upload_dir,
        "config loaded"
    );

    backend_bootstrap::run_standalone(config).await
}

fn init_tracing(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "leakwatch-backend.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
