//! # 载体预处理模块
//!
//! 在嵌入之前把任意载体图像规整为固定尺寸的 RGB 画布：
//! 先缩放到目标尺寸，再可选地量化到有限调色板并展开回 RGB。

use color_quant::NeuQuant;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::io::{self, ErrorKind};

use crate::constants::{
    DEFAULT_PALETTE_COLORS, DEFAULT_SIZE, MAX_PALETTE_COLORS, MIN_PALETTE_COLORS,
    QUANT_SAMPLE_FACTOR,
};

/// 载体预处理参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverOptions {
    pub width: u32,
    pub height: u32,
    /// 调色板颜色数，`None` 表示跳过量化。
    pub palette: Option<usize>,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            palette: Some(DEFAULT_PALETTE_COLORS),
        }
    }
}

/// 使用 NeuQuant 将图像量化为 `colors` 种颜色，再展开回 RGB。透明度被丢弃。
pub fn quantize(image: &DynamicImage, colors: usize) -> RgbImage {
    let rgba = image.to_rgba8();
    let quant = NeuQuant::new(QUANT_SAMPLE_FACTOR, colors, rgba.as_raw());
    let palette = quant.color_map_rgb();

    let mut expanded = RgbImage::new(rgba.width(), rgba.height());
    for (source, target) in rgba.pixels().zip(expanded.pixels_mut()) {
        let index = quant.index_of(&source.0) * 3;
        *target = Rgb([palette[index], palette[index + 1], palette[index + 2]]);
    }

    expanded
}

/// 将载体规整为 `options` 指定的 RGB 画布。
///
/// 尺寸已经符合时不做缩放，否则使用 Lanczos3 精确缩放到目标尺寸 (不保持宽高比)。
/// 量化在缩放之后进行，因此最终画布中的颜色数不超过调色板大小。
///
/// # Errors
///
/// * 载体不含任何像素。
/// * 目标尺寸为 0。
/// * 调色板颜色数超出允许范围。
pub fn prepare_cover(image: &DynamicImage, options: &CoverOptions) -> Result<RgbImage, io::Error> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "The cover image contains no pixels.",
        ));
    }

    if options.width == 0 || options.height == 0 {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "The target raster dimensions must be non-zero.",
        ));
    }

    if let Some(colors) = options.palette {
        if !(MIN_PALETTE_COLORS..=MAX_PALETTE_COLORS).contains(&colors) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "The palette size must be between {MIN_PALETTE_COLORS} and {MAX_PALETTE_COLORS}, got {colors}."
                ),
            ));
        }
    }

    let mut rgb = image.to_rgb8();
    if rgb.dimensions() != (options.width, options.height) {
        rgb = imageops::resize(&rgb, options.width, options.height, FilterType::Lanczos3);
    }

    match options.palette {
        Some(colors) => Ok(quantize(&DynamicImage::ImageRgb8(rgb), colors)),
        None => Ok(rgb),
    }
}
