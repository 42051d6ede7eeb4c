use clap::Parser;
use roster_boards::core::roster;
use roster_boards::utils::logger;
use roster_boards::{CliConfig, HttpTransport, Provisioner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting roster-boards");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 合併環境變數並驗證:必要值缺少就直接失敗,不用占位值硬跑
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let records = match roster::load_roster(&config.roster, config.delimiter) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("❌ Failed to read roster {}: {}", config.roster, e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "📋 Loaded {} roster records from {}",
        records.len(),
        config.roster
    );

    let transport = HttpTransport::new(
        config.endpoint.clone(),
        config.token.clone(),
        config.timeout_seconds,
    )?;
    let provisioner = Provisioner::new(transport, config.clone());

    match provisioner.run(&records).await {
        Ok(summary) => {
            println!(
                "✅ Batch finished: {} provisioned, {} failed",
                summary.provisioned.len(),
                summary.failed.len()
            );
            for failure in &summary.failed {
                println!("  ❌ {}: {}", failure.label, failure.reason);
            }
            // 單筆失敗不影響結束碼;重跑批次是既定的補救方式
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Batch aborted: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
