//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::i18n::Language;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，将短文本隐藏在图像 RGB 通道的最低有效位中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Hide short text messages in the least significant bits of an image's RGB channels. \
                  The message ends with a fixed 16-bit terminator; results are always saved as PNG."
)]
pub struct Cli {
    /// 状态提示使用的语言。
    #[arg(long, value_enum, env = "LSB_TEXT_LANG", default_value_t = Language::English, global = true)]
    pub lang: Language,

    /// 提高日志级别 (-v: info, -vv: debug)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、reveal (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在图像中隐藏一段文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Reveal(RevealArgs),

    /// 显示图像最多能隐藏多少字符。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (PNG, JPEG, BMP 等)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 直接在命令行给出的待隐藏文本。
    #[arg(short, long, conflicts_with = "text", required_unless_present = "text")]
    pub message: Option<String>,

    /// 从文件读取待隐藏的文本。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 结果图像的保存路径，默认为源图像旁的 `stego_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 将码点大于 255 的字符截断为低 8 位，而不是报错。
    #[arg(long)]
    pub truncate: bool,
}

/// 'reveal' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RevealArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后保存的路径，缺省时输出到标准输出。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
