//! # LSB 隐写核心模块
//!
//! 将文本逐字符打包为 8 bit (高位在前)，末尾追加 16 bit 结束标记，
//! 再按行优先顺序依次写入每个像素 R、G、B 通道的最低有效位。
//!
//! 解码时取出全部最低有效位，以 **第一次** 出现的结束标记为消息终点。
//! 这是一种启发式分隔：若载荷本身的比特模式恰好包含结束标记，
//! 或者未经隐写的图像中碰巧出现该模式，解码结果会被提前截断或成为乱码。

use crate::constants::{BITS_PER_CHAR, CHANNELS_PER_PIXEL, TERMINATOR, TERMINATOR_BITS};
use crate::error::{Result, StegoError};
use image::{DynamicImage, ImageFormat, RgbImage};
use log::{debug, warn};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// 码点大于 255 的字符的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharPolicy {
    /// 遇到第一个无法用单字节表示的字符即报错。
    #[default]
    Reject,
    /// 只保留码点的低 8 位。解码后得到的是另一个字符。
    Truncate,
}

/// 一张 `width` x `height` 图像可用于隐写的总比特数。
pub fn capacity_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

/// 扣除结束标记后，图像最多能容纳的字符数。
pub fn max_message_chars(width: u32, height: u32) -> usize {
    capacity_bits(width, height).saturating_sub(TERMINATOR_BITS) / BITS_PER_CHAR
}

/// 将消息转换为比特流，每个元素为 `0` 或 `1`。
///
/// # Errors
///
/// 在 [`CharPolicy::Reject`] 策略下，码点超过 255 的字符会返回
/// [`StegoError::UnsupportedCharacter`]。
pub fn encode_bits(message: &str, policy: CharPolicy) -> Result<Vec<u8>> {
    let mut bits = Vec::with_capacity(message.len() * BITS_PER_CHAR + TERMINATOR_BITS);

    for (index, ch) in message.chars().enumerate() {
        let code = u32::from(ch);
        let byte = match u8::try_from(code) {
            Ok(byte) => byte,
            Err(_) => match policy {
                CharPolicy::Reject => return Err(StegoError::UnsupportedCharacter { ch, index }),
                CharPolicy::Truncate => {
                    warn!("Truncating character {ch:?} at index {index} to its low byte");
                    (code & 0xFF) as u8
                }
            },
        };
        bits.extend((0..BITS_PER_CHAR).rev().map(|shift| (byte >> shift) & 1));
    }

    bits.extend_from_slice(&TERMINATOR);
    Ok(bits)
}

/// 将比特流写入载体图像各通道的最低有效位。
///
/// `RgbImage` 的底层缓冲区按行优先顺序存放 `R, G, B` 三元组，
/// 因此缓冲区顺序就是比特写入顺序。比特流用尽后其余通道保持不变。
///
/// # Errors
///
/// 比特流长度超过 `3 x 像素数` 时返回 [`StegoError::Capacity`]，载体不会被修改。
pub fn embed_bits(carrier: &mut RgbImage, bits: &[u8]) -> Result<()> {
    let available = capacity_bits(carrier.width(), carrier.height());
    if bits.len() > available {
        return Err(StegoError::Capacity {
            required: bits.len(),
            available,
        });
    }

    carrier
        .iter_mut()
        .zip(bits)
        .for_each(|(channel, &bit)| *channel = (*channel & 0xFE) | (bit & 1));

    debug!("Embedded {} of {} available bits", bits.len(), available);
    Ok(())
}

/// 按写入时的顺序取出每个通道的最低有效位。
pub fn extract_bits(carrier: &RgbImage) -> Vec<u8> {
    carrier.iter().map(|channel| channel & 1).collect()
}

/// 查找结束标记第一次出现的位置。
pub fn find_terminator(bits: &[u8]) -> Option<usize> {
    bits.windows(TERMINATOR_BITS)
        .position(|window| window == TERMINATOR)
}

/// 每 8 bit 组成一个字节并映射为同码点的字符，末尾不足 8 bit 的部分被丢弃。
pub fn bits_to_text(bits: &[u8]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | (bit & 1)))
        .map(char::from)
        .collect()
}

/// 在内存中的图像里隐藏消息，返回新的 RGB 图像。
///
/// 非 RGB8 的图像会先被转换：Alpha 通道被丢弃，16 bit 深度被压缩为 8 bit。
/// 该转换对原本不是 RGB8 的图像是有损的。
pub fn hide_message(image: &DynamicImage, message: &str, policy: CharPolicy) -> Result<RgbImage> {
    let bits = encode_bits(message, policy)?;
    let mut carrier = image.to_rgb8();
    embed_bits(&mut carrier, &bits)?;
    Ok(carrier)
}

/// 尝试从图像中恢复隐藏的消息。未找到结束标记时返回 `None`。
pub fn reveal_message(image: &DynamicImage) -> Option<String> {
    let bits = extract_bits(&image.to_rgb8());
    let end = find_terminator(&bits)?;
    debug!("Terminator found at bit {} of {}", end, bits.len());
    Some(bits_to_text(&bits[..end]))
}

/// 读取并解码图像文件。
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).map_err(|source| StegoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image::load_from_memory(&bytes)?)
}

/// 读取 `source`，隐藏 `message`，并以 PNG 格式写入 `dest`。
///
/// 无论 `dest` 的扩展名是什么，写出的内容始终是 PNG。
pub fn encode_file(source: &Path, message: &str, dest: &Path, policy: CharPolicy) -> Result<()> {
    let image = load_image(source)?;
    debug!(
        "Loaded carrier {}x{} ({:?})",
        image.width(),
        image.height(),
        image.color()
    );

    let stego = hide_message(&image, message, policy)?;

    let mut png = Cursor::new(Vec::new());
    stego.write_to(&mut png, ImageFormat::Png)?;
    fs::write(dest, png.into_inner()).map_err(|source| StegoError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

/// 读取图像文件并尝试恢复隐藏的消息。
///
/// # Errors
///
/// 只有在文件无法读取或图像无法解码时才返回错误，
/// 未找到消息时返回 `Ok(None)`。
pub fn decode_file(source: &Path) -> Result<Option<String>> {
    let image = load_image(source)?;
    Ok(reveal_message(&image))
}
