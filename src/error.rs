//! # 错误类型模块
//!
//! 隐写核心函数返回的错误。"未找到隐藏消息" 不是错误，而是 `Ok(None)`。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 无法读取源图像文件。
    #[error("Unable to read image file: {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 无法写入目标图像文件。
    #[error("Unable to write image file: {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 图像数据无法解码或编码。
    #[error("Image data could not be processed")]
    Image(#[from] image::ImageError),

    /// 消息比特流超出图像容量。
    #[error("Not enough space in the image: required {required} bits, available {available} bits")]
    Capacity { required: usize, available: usize },

    /// 码点超出单字节范围的字符。
    #[error("Character {ch:?} at index {index} cannot be packed into 8 bits")]
    UnsupportedCharacter { ch: char, index: usize },
}

impl StegoError {
    /// 是否属于文件读写失败 (`Read` 或 `Write`)。
    pub fn is_io(&self) -> bool {
        matches!(self, StegoError::Read { .. } | StegoError::Write { .. })
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
