use clap::Parser;
use std::process;

use twincat_sweeper_lib::commands::{self, Command, EXIT_FATAL};
use twincat_sweeper_lib::modules::common::{elevation, logging};

#[derive(Parser, Debug)]
#[command(name = "twincat-sweeper")]
#[command(about = "清理 Beckhoff TwinCAT 卸载后的残留文件、注册表项和环境变量", long_about = None)]
#[command(version)]
struct Cli {
    /// 不指定时等同于 clean
    #[command(subcommand)]
    command: Option<Command>,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    if let Err(e) = elevation::ensure_elevated() {
        eprintln!("错误: {}", e);
        process::exit(EXIT_FATAL);
    }

    let result = match cli.command.unwrap_or(Command::Clean(Default::default())) {
        Command::Clean(cmd) => commands::clean::execute(cmd).await,
        Command::Scan(cmd) => commands::scan::execute(cmd).await,
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!("错误: {:#}", e);
            eprintln!("错误: {:#}", e);
            process::exit(EXIT_FATAL);
        }
    }
}
