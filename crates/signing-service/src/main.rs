use clap::Parser;
use signing_service::run;
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(about = "Signature device service with chained signatures")]
struct Args {
    /// Host to bind the http server on
    #[clap(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the http server on
    #[clap(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Log level
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(args.log_level.to_string()))
        .init();

    run(args.host, args.port).await
}
