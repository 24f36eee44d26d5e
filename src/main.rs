use aiployer::app::{self, bootstrap};
use aiployer::config::load_env_file;
use aiployer::utils::error::ErrorSeverity;
use aiployer::utils::logger::{self, LogFormat};
use aiployer::utils::validation::Validate;
use aiployer::{AppConfig, CliConfig, MarketError};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local 優先於 .env，檔案不存在時略過
    let env_files: Vec<_> = [".env.local", ".env"]
        .into_iter()
        .map(|path| (path, load_env_file(path)))
        .collect();

    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_json_flag(cli.json_logs), cli.verbose);

    for (path, outcome) in env_files {
        match outcome {
            Ok(true) => tracing::debug!("📄 Loaded {}", path),
            Ok(false) => {}
            Err(e) => tracing::warn!("⚠️ {} ({})", e, e.recovery_suggestion()),
        }
    }

    tracing::info!("🚀 Starting AIployer");

    let config = match AppConfig::load(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    for line in config.summary() {
        tracing::info!("   {}", line);
    }

    let market = match bootstrap::build_marketplace(&config) {
        Ok(market) => Arc::new(market),
        Err(e) => exit_with(e),
    };

    if cli.check {
        tracing::info!("✅ Configuration loaded and validated successfully");
        println!("✅ Configuration OK ({} tasks)", market.catalog().len());
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🌐 AIployer running at http://{}", listener.local_addr()?);
    tracing::info!("📋 Tasks: {} available", market.catalog().len());
    if !market.verification_enabled() {
        tracing::warn!("🤖 OpenAI not configured - running in demo mode");
    }
    if !market.payments_enabled() {
        tracing::warn!("💸 Pool wallet not configured - payments disabled");
    }

    app::serve(listener, market, config.max_upload_bytes, shutdown_signal()).await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn exit_with(e: MarketError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
