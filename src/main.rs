use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use lsb_text::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_reveal},
};

/// 根据 `-v` 的次数设置默认日志级别，`RUST_LOG` 可以覆盖它。
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`hide`、`reveal` 或 `capacity`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args, cli.lang),
        Commands::Reveal(args) => handle_reveal(args, cli.lang).map(|_| ()),
        Commands::Capacity(args) => handle_capacity(args, cli.lang).map(|_| ()),
    }
}
