//! # lsb_text 库
//!
//! 本库包含以结束标记分隔的 LSB 文本隐写工具的核心逻辑。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod i18n;
pub mod steganography;
pub mod worker;

pub use error::{Result, StegoError};
