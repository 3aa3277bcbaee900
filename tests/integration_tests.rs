use image::{ImageBuffer, Rgb, RgbImage, Rgba};
use lsb_text::{
    StegoError,
    cli::{CapacityArgs, HideArgs, RevealArgs},
    constants::TERMINATOR,
    handler::{handle_capacity, handle_hide, handle_reveal},
    i18n::Language,
    steganography::{CharPolicy, decode_file, encode_file},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 平滑渐变图像，最低有效位奇偶混杂，但不包含结束标记
fn create_gradient_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 + y) as u8, (y * 13 + 3) as u8, (x ^ y) as u8 | 0x40])
    })
    .save(path)
    .expect("Failed to create gradient test image.");
}

fn hide_args(image: &Path, message: &str, dest: Option<&Path>) -> HideArgs {
    HideArgs {
        image: image.to_path_buf(),
        message: Some(message.to_string()),
        text: None,
        dest: dest.map(Path::to_path_buf),
        force: false,
        truncate: false,
    }
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_reveal_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! Ça marche très bien.";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide，文本来自文件
    let args = HideArgs {
        image: original_image_path.clone(),
        message: None,
        text: Some(source_text_path.clone()),
        dest: Some(hidden_image_path.clone()),
        force: false,
        truncate: false,
    };
    handle_hide(args, Language::English)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_reveal
    let args = RevealArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        force: false,
    };
    let revealed = handle_reveal(args, Language::English)?;
    assert_eq!(revealed.as_deref(), Some(original_text));

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_with_default_dest() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    create_test_image(&original_image_path, 40, 40);

    handle_hide(
        hide_args(&original_image_path, "Testing default path generation.", None),
        Language::Amharic,
    )?;

    // BMP 输入也会以 PNG 保存
    let expected_hidden_path = dir.path().join("stego_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );
    assert_eq!(
        image::guess_format(&fs::read(&expected_hidden_path)?)?,
        image::ImageFormat::Png
    );

    let revealed = handle_reveal(
        RevealArgs {
            image: expected_hidden_path,
            text: None,
            force: false,
        },
        Language::Amharic,
    )?;
    assert_eq!(
        revealed.as_deref(),
        Some("Testing default path generation.")
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide(
        hide_args(&image_path, "some text", Some(&dest_path)),
        Language::English,
    );
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let mut args = hide_args(&image_path, "some text", Some(&dest_path));
    args.force = true;
    handle_hide(args, Language::English)?;

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");
    assert_eq!(decode_file(&dest_path)?.as_deref(), Some("some text"));

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let dest_path = dir.path().join("dest.png");

    // 10 x 10 的图像只有 300 bit，40 个字符需要 336 bit
    create_test_image(&image_path, 10, 10);

    let result = handle_hide(
        hide_args(&image_path, &"a".repeat(40), Some(&dest_path)),
        Language::English,
    );

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Not enough space"));
        assert!(matches!(
            e.downcast_ref::<StegoError>(),
            Some(StegoError::Capacity {
                required: 336,
                available: 300
            })
        ));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证空消息会被拒绝
#[test]
fn test_handle_hide_rejects_blank_message() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    create_test_image(&image_path, 20, 20);

    let result = handle_hide(hide_args(&image_path, "  \n", None), Language::English);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("empty"));
    }

    Ok(())
}

/// 验证码点超过 255 的字符默认被拒绝，`--truncate` 时被截断
#[test]
fn test_wide_characters_policy() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");
    create_test_image(&image_path, 30, 30);

    let result = handle_hide(
        hide_args(&image_path, "hi 世界", Some(&dest_path)),
        Language::English,
    );
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(matches!(
            e.downcast_ref::<StegoError>(),
            Some(StegoError::UnsupportedCharacter { ch: '世', index: 3 })
        ));
    }

    let mut args = hide_args(&image_path, "hi \u{141}", Some(&dest_path));
    args.truncate = true;
    handle_hide(args, Language::English)?;
    assert_eq!(decode_file(&dest_path)?.as_deref(), Some("hi A"));

    Ok(())
}

/// 验证从未隐写过的图像中恢复时不会报错，也不会写出文件
#[test]
fn test_reveal_clean_image_is_not_an_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("clean.png");
    let text_path = dir.path().join("out.txt");
    create_gradient_image(&image_path, 64, 48);

    let revealed = handle_reveal(
        RevealArgs {
            image: image_path,
            text: Some(text_path.clone()),
            force: false,
        },
        Language::English,
    )?;

    assert_eq!(revealed, None);
    assert!(!text_path.exists());
    assert_eq!(decode_file(&dir.path().join("clean.png"))?, None);

    Ok(())
}

/// 验证结束标记位于开头时 (解出空串) 按未找到消息处理
#[test]
fn test_reveal_empty_message_is_a_miss() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("empty.png");
    let text_path = dir.path().join("out.txt");

    // 前 16 个通道的最低有效位恰好是结束标记，其余通道均为偶数
    let mut carrier = RgbImage::from_pixel(8, 8, Rgb([100, 150, 200]));
    carrier
        .iter_mut()
        .zip(TERMINATOR)
        .for_each(|(channel, bit)| *channel |= bit);
    carrier.save(&image_path)?;
    assert_eq!(decode_file(&image_path)?.as_deref(), Some(""));

    let revealed = handle_reveal(
        RevealArgs {
            image: image_path,
            text: Some(text_path.clone()),
            force: false,
        },
        Language::English,
    )?;

    assert_eq!(revealed, None);
    assert!(!text_path.exists(), "No text file should be written for an empty message.");

    Ok(())
}

/// 验证无法读取的图像会返回错误
#[test]
fn test_reveal_missing_image_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = handle_reveal(
        RevealArgs {
            image: dir.path().join("missing.png"),
            text: None,
            force: false,
        },
        Language::English,
    );
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(matches!(
            e.downcast_ref::<StegoError>(),
            Some(StegoError::Read { .. })
        ));
    }

    Ok(())
}

/// 验证容量计算
#[test]
fn test_handle_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    create_test_image(&image_path, 10, 10);

    // (300 - 16) / 8 = 35
    let chars = handle_capacity(
        CapacityArgs {
            image: image_path.clone(),
        },
        Language::English,
    )?;
    assert_eq!(chars, 35);

    let chars = handle_capacity(CapacityArgs { image: image_path }, Language::Amharic)?;
    assert_eq!(chars, 35);

    let result = handle_capacity(
        CapacityArgs {
            image: dir.path().join("missing.png"),
        },
        Language::Amharic,
    );
    assert!(result.is_err());

    Ok(())
}

/// 验证同一张隐写图像多次解码结果一致，且每个通道最多变化 1
#[test]
fn test_file_round_trip_is_stable() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");
    create_test_image(&image_path, 25, 25);

    encode_file(&image_path, "stable", &dest_path, CharPolicy::Reject)?;

    let first = decode_file(&dest_path)?;
    let second = decode_file(&dest_path)?;
    assert_eq!(first.as_deref(), Some("stable"));
    assert_eq!(first, second);

    let before = image::open(&image_path)?.to_rgb8();
    let after = image::open(&dest_path)?.to_rgb8();
    assert_eq!(before.dimensions(), after.dimensions());
    assert!(
        before
            .iter()
            .zip(after.iter())
            .all(|(a, b)| a.abs_diff(*b) <= 1)
    );

    Ok(())
}
