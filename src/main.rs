use clap::Parser;

use utm_attribution::cli::Cli;
use utm_attribution::config::{StaticConfig, get_config, init_config};
use utm_attribution::runtime::run_server;
use utm_attribution::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    if let Err(e) = init_config(cli.config.as_deref()) {
        eprintln!("{}", e.format_colored());
        return Err(e.into());
    }
    let config = get_config();

    // guard 需要存活到进程结束，保证日志刷盘
    let _guard = init_logging(&config.logging)?;

    run_server(&config).await
}
