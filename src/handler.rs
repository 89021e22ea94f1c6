//! # 命令处理逻辑模块
//!
//! 协调文件 I/O、载体预处理与核心嵌入算法，并向用户报告结果。

use crate::cli::EmbedArgs;
use crate::cover::prepare_cover;
use crate::steganography::{EmbedSummary, capacity, embed};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, ImageReader};
use std::fs;
use std::path::Path;

/// 可以无损保存载荷位的输出格式。
const LOSSLESS_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Qoi,
];

/// 由输出路径的扩展名确定输出格式，拒绝会破坏低位数据的有损格式。
fn output_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unable to determine output image format from: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        LOSSLESS_FORMATS.contains(&format),
        "Output format must be lossless (PNG, BMP, TIFF or QOI), got {:?} for: {}",
        format,
        path.to_string_lossy().red().bold()
    );

    Ok(format)
}

/// 处理嵌入命令的执行逻辑。
///
/// 读取载体图像和载荷文件，将载体规整为目标画布，循环写入载荷，
/// 最后一次性写出结果图像。结果图像只在整个画布构建完成后才写入，
/// 因此失败的运行不会留下不完整的输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与画布参数的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出路径的扩展名不是无损图像格式。
/// * 无法读取载体图像或载荷文件。
/// * 载体图像无法解码。
/// * 载荷短于 2 字节。
/// * 无法写入结果图像。
pub fn handle_embed(args: EmbedArgs) -> Result<EmbedSummary> {
    let format = output_format(&args.output)?;

    let payload = fs::read(&args.payload).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    let picture = ImageReader::open(&args.cover)
        .with_context(|| {
            format!(
                "Unable to read cover image file: {}",
                args.cover.to_string_lossy().red().bold()
            )
        })?
        .with_guessed_format()
        .with_context(|| {
            format!(
                "Unable to detect cover image format: {}",
                args.cover.to_string_lossy().red().bold()
            )
        })?
        .decode()
        .with_context(|| {
            format!(
                "Unable to decode cover image: {}",
                args.cover.to_string_lossy().red().bold()
            )
        })?;

    let mut canvas = prepare_cover(&picture, &args.cover_options()).with_context(|| {
        format!(
            "Failed to prepare cover image: {}",
            args.cover.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Embedding {} ({} bytes) into a {}x{} canvas, capacity {} bytes",
        args.payload.to_string_lossy().green().bold(),
        payload.len(),
        args.width,
        args.height,
        capacity(args.width, args.height, &args.bits)
    );

    let summary = embed(&mut canvas, &payload, &args.bits, args.traversal).with_context(|| {
        format!(
            "Failed to embed payload: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    canvas.save_with_format(&args.output, format).with_context(|| {
        format!(
            "Unable to write to output image file: {}",
            args.output.to_string_lossy().red().bold()
        )
    })?;

    if summary.is_truncated() {
        println!(
            "{} payload exceeds capacity, {} trailing bytes were not embedded",
            "Warning:".yellow().bold(),
            summary.dropped().to_string().red().bold()
        );
    } else if summary.is_repeated() {
        println!(
            "Payload written {} times in full, plus {} bytes of a partial pass",
            summary.passes.to_string().green(),
            summary.tail.to_string().green()
        );
    }

    println!(
        "Packed {} KiB ({} bytes) into {}",
        format!("{:.1}", summary.embedded as f64 / 1024.0).green().bold(),
        summary.embedded,
        args.output.to_string_lossy().green().bold()
    );

    Ok(summary)
}
