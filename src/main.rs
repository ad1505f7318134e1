mod cli;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // .env가 없어도 된다
    let _ = dotenvy::dotenv();

    // stdout은 JSON 결과 전용이므로 로그는 stderr로 보낸다
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("preview_finder=warn")),
        )
        .init();

    let cli = cli::Cli::parse();

    if let Err(e) = cli::run(cli).await {
        eprintln!("오류: {:#}", e);
        std::process::exit(1);
    }
}
