use clap::Parser;
use steam_state_tables::{app, cli::Cli, config};
use tracing::{warn, Level};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() {
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;
    let level = cfg.log.max_level();
    tracing_subscriber::fmt()
        .with_max_level(level.unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .init();
    if level.is_none() {
        warn!(level = %cfg.log.level, "알 수 없는 log.level, info 수준을 사용합니다");
    }
    app::run(&cfg, cli.command)?;
    Ok(())
}
