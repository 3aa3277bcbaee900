//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`reveal` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、在后台线程上调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RevealArgs};
use crate::constants::{STEGO_EXTENSION, STEGO_PREFIX, TERMINATOR_BITS};
use crate::i18n::Language;
use crate::steganography::{CharPolicy, capacity_bits, max_message_chars};
use crate::worker::{self, Job, JobOutcome};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// 轮询后台任务的间隔。
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 任务仍在运行时输出调试日志的间隔。
const PROGRESS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取待隐藏的文本、确定输出路径并检查覆盖保护，
/// 然后在后台线程上完成隐写并把结果写入目标图像文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 待隐藏的文本为空。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本，或文本包含无法打包的字符。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs, lang: Language) -> Result<()> {
    let messages = lang.messages();

    let message = match (args.message, &args.text) {
        (Some(message), _) => message,
        (None, Some(path)) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either a message or a text file must be given."),
    };

    anyhow::ensure!(
        !message.trim().is_empty(),
        "The message to hide is empty."
    );

    let dest = args
        .dest
        .unwrap_or_else(|| default_stego_path(&args.image));
    ensure_can_write(&dest, args.force)?;

    let policy = if args.truncate {
        CharPolicy::Truncate
    } else {
        CharPolicy::Reject
    };

    println!("{}", messages.processing_hide);

    let job = Job::Hide {
        image: args.image.clone(),
        message,
        dest,
        policy,
    };
    let outcome = run_to_completion(job).with_context(|| {
        format!(
            "{}: {}",
            messages.error,
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if let JobOutcome::Hidden(path) = outcome {
        println!("{}", messages.hide_complete.green());
        println!(
            "{} {}",
            messages.saved,
            path.to_string_lossy().green().bold()
        );
    }

    Ok(())
}

/// 处理 'Reveal' 命令的执行逻辑。
///
/// 在后台线程上读取图像并尝试恢复隐藏的文本。恢复成功时写入 `--text`
/// 指定的文件，否则打印到标准输出。没有找到消息不视为错误。
///
/// # Returns
///
/// 恢复出的文本；图像中没有消息或消息为空时为 `None`。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 目标文本文件已存在且未指定 `--force`。
/// * 无法写入到目标文本文件。
pub fn handle_reveal(args: RevealArgs, lang: Language) -> Result<Option<String>> {
    let messages = lang.messages();

    if let Some(path) = &args.text {
        ensure_can_write(path, args.force)?;
    }

    println!("{}", messages.processing_reveal);

    let outcome = run_to_completion(Job::Reveal {
        image: args.image.clone(),
    })
    .with_context(|| {
        format!(
            "{}: {}",
            messages.error,
            args.image.to_string_lossy().red().bold()
        )
    })?;

    // 结束标记紧跟在开头时解出的是空串，与未找到消息同等对待
    let revealed = match outcome {
        JobOutcome::Revealed(revealed) => revealed.filter(|text| !text.is_empty()),
        other => anyhow::bail!("Unexpected outcome from a reveal job: {other:?}"),
    };

    match (&revealed, &args.text) {
        (None, _) => println!("{}", messages.no_message_found.yellow()),
        (Some(text), Some(path)) => {
            fs::write(path, text).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "{} {}",
                messages.reveal_complete.green(),
                path.to_string_lossy().green().bold()
            );
        }
        (Some(text), None) => {
            println!("{}", messages.reveal_complete.green());
            println!("{}", messages.hidden_message.bold());
            println!("{text}");
        }
    }

    Ok(revealed)
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 只读取图像头部获得尺寸，报告可用比特数和最多可隐藏的字符数。
pub fn handle_capacity(args: CapacityArgs, lang: Language) -> Result<usize> {
    let messages = lang.messages();

    let (width, height) = image::image_dimensions(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let bits = capacity_bits(width, height);
    let chars = max_message_chars(width, height);

    println!(
        "{} ({}x{})",
        args.image.to_string_lossy().bold(),
        width,
        height
    );
    println!(
        "{} {} ({} {})",
        messages.usable_bits,
        bits.to_string().green().bold(),
        TERMINATOR_BITS,
        messages.reserved_for_terminator
    );
    println!(
        "{} {}",
        messages.max_characters,
        chars.to_string().green().bold()
    );

    Ok(chars)
}

/// 源图像旁的默认输出路径 `stego_<文件名>.png`。
pub fn default_stego_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    image.with_file_name(format!("{STEGO_PREFIX}{stem}.{STEGO_EXTENSION}"))
}

fn ensure_can_write(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. Use --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 启动后台任务并轮询直到结束。
fn run_to_completion(job: Job) -> Result<JobOutcome> {
    let started = Instant::now();
    let mut handle = worker::spawn(job).context("Unable to start the worker thread")?;

    let mut next_report = PROGRESS_REPORT_INTERVAL;
    loop {
        if let Some(result) = handle.try_outcome() {
            info!("Job finished in {:?}", started.elapsed());
            return result;
        }
        if report_due(started.elapsed(), &mut next_report) {
            debug!("Job still running after {:?}", started.elapsed());
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// 到达下一个报告时间点时返回 `true`，并把时间点推到 `elapsed` 之后。
fn report_due(elapsed: Duration, next_report: &mut Duration) -> bool {
    if elapsed < *next_report {
        return false;
    }
    while *next_report <= elapsed {
        *next_report += PROGRESS_REPORT_INTERVAL;
    }
    true
}
