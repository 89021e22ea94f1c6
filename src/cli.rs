//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构。所有选项都有默认值，
//! 默认使用 1024×1024 画布与 512 色调色板。

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_OUTPUT, DEFAULT_PALETTE_COLORS, DEFAULT_SIZE, MAX_PALETTE_COLORS, MIN_PALETTE_COLORS,
};
use crate::cover::CoverOptions;
use crate::steganography::{BitLayout, Traversal};

/// 将任意文件的字节写入载体图像像素低位的命令行工具。
#[derive(Parser, Debug)]
#[command(
    name = "embed",
    version,
    about,
    long_about = "将任意文件的字节写入载体图像像素的低位。载荷不足以填满画布时循环重复，超出容量的部分被截断。"
)]
pub struct EmbedArgs {
    /// 载体图像路径 (如 PNG, JPEG, BMP)。
    pub cover: PathBuf,

    /// 要嵌入的载荷文件路径，至少 2 字节。
    pub payload: PathBuf,

    /// 结果图像的输出路径。
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// 画布宽度 (像素)。
    #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// 画布高度 (像素)。
    #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// 嵌入前量化所用的调色板颜色数。
    #[arg(
        long,
        default_value_t = DEFAULT_PALETTE_COLORS,
        value_parser = RangedU64ValueParser::<usize>::new()
            .range(MIN_PALETTE_COLORS as u64..=MAX_PALETTE_COLORS as u64),
        conflicts_with = "no_palette"
    )]
    pub palette: usize,

    /// 跳过调色板量化，直接使用载体的 RGB 数据。
    #[arg(long)]
    pub no_palette: bool,

    /// R、G、B 通道各自承载的载荷位数，总和须为 8 的倍数。
    #[arg(long, default_value = "5,5,6", value_parser = parse_bit_layout)]
    pub bits: BitLayout,

    /// 像素遍历顺序。
    #[arg(long, value_enum, default_value_t = Traversal::Columns)]
    pub traversal: Traversal,
}

impl EmbedArgs {
    /// 由命令行参数得到载体预处理参数。
    pub fn cover_options(&self) -> CoverOptions {
        CoverOptions {
            width: self.width,
            height: self.height,
            palette: (!self.no_palette).then_some(self.palette),
        }
    }
}

/// 解析形如 `5,5,6` 的通道位数列表。
fn parse_bit_layout(value: &str) -> Result<BitLayout, String> {
    let bits = value
        .split(',')
        .map(|part| part.trim().parse::<u8>().map_err(|e| format!("'{part}': {e}")))
        .collect::<Result<Vec<u8>, String>>()?;

    let bits: [u8; 3] = bits
        .try_into()
        .map_err(|_| "expected exactly three comma-separated values (R,G,B)".to_string())?;

    BitLayout::new(bits).map_err(|e| e.to_string())
}
