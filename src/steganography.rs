//! # 像素级嵌入编解码核心
//!
//! 将任意字节载荷写入 RGB 像素各通道的低位。每个像素消耗固定数量的载荷字节，
//! 载荷用尽时从头循环，直到填满整个画布。

use clap::ValueEnum;
use image::{Rgb, RgbImage};
use std::io::{self, ErrorKind};

use crate::constants::{DEFAULT_CHANNEL_BITS, MIN_PAYLOAD_LEN};

/// 每个像素 R、G、B 通道分别承载的载荷位数。
///
/// 一个像素的载荷字节按小端序拼成一个字 `w`，依次由 R、G、B 通道取走低位：
/// R 取 `w` 的最低 `r` 位，G 取接下来的 `g` 位，B 取剩余的 `b` 位。
/// 默认布局 `5,5,6` 即:
///
/// ```text
/// R' = (R & 0b1110_0000) | (b0 & 0b0001_1111)
/// G' = (G & 0b1110_0000) | (b0 >> 5) | ((b1 << 3) & 0b0001_1000)
/// B' = (B & 0b1100_0000) |  (b1 >> 2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    bits: [u8; 3],
}

impl BitLayout {
    /// 创建一个新的位布局。
    ///
    /// # Errors
    ///
    /// 任一通道超过 8 位，或总位数不是 8 的正整数倍时返回 `InvalidInput`。
    pub fn new(bits: [u8; 3]) -> Result<Self, io::Error> {
        if bits.iter().any(|&n| n > u8::BITS as u8) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                "A channel cannot carry more than 8 payload bits.",
            ));
        }

        let total: u32 = bits.iter().map(|&n| u32::from(n)).sum();
        if total == 0 || total % u8::BITS != 0 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("The payload bits per pixel must be a non-zero multiple of 8, got {total}."),
            ));
        }

        Ok(Self { bits })
    }

    pub fn bits(&self) -> [u8; 3] {
        self.bits
    }

    /// 每个像素消耗的载荷字节数。
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits.iter().map(|&n| usize::from(n)).sum::<usize>() / u8::BITS as usize
    }

    /// 指定通道中保留载体原始数据的位掩码。
    pub fn keep_mask(&self, channel: usize) -> u8 {
        !payload_mask(self.bits[channel])
    }
}

impl Default for BitLayout {
    fn default() -> Self {
        Self {
            bits: DEFAULT_CHANNEL_BITS,
        }
    }
}

/// 像素的遍历顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Traversal {
    /// 外层循环为 x，内层循环为 y，即按 `(x, y)` 坐标的第一维优先。
    #[default]
    Columns,
    /// 外层循环为 y，内层循环为 x (行优先)。
    Rows,
}

/// 一次嵌入的统计结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedSummary {
    /// 画布可容纳的载荷字节数。
    pub capacity: usize,
    /// 原始载荷长度。
    pub payload_len: usize,
    /// 实际写入画布的不同载荷字节数，即 `min(payload_len, capacity)`。
    pub embedded: usize,
    /// 载荷被完整写入的遍数。
    pub passes: usize,
    /// 最后一遍不完整写入的字节数，满足 `passes * payload_len + tail == capacity`。
    pub tail: usize,
}

impl EmbedSummary {
    pub fn is_truncated(&self) -> bool {
        self.payload_len > self.capacity
    }

    /// 载荷短于容量而被循环写入。
    pub fn is_repeated(&self) -> bool {
        self.payload_len < self.capacity
    }

    /// 因容量不足而未被写入的载荷字节数。
    pub fn dropped(&self) -> usize {
        self.payload_len.saturating_sub(self.capacity)
    }
}

fn payload_mask(n: u8) -> u8 {
    ((1u16 << n) - 1) as u8
}

/// 将一个像素的载荷字节写入该像素的低位，返回新像素。
///
/// `bytes` 中超出 `layout.bytes_per_pixel()` 的部分被忽略，不足的部分视为 0。
pub fn pack_pixel(pixel: Rgb<u8>, bytes: &[u8], layout: &BitLayout) -> Rgb<u8> {
    let word = bytes
        .iter()
        .take(layout.bytes_per_pixel())
        .enumerate()
        .fold(0u32, |word, (k, &byte)| word | u32::from(byte) << (8 * k));

    let mut packed = pixel;
    let mut shift = 0;
    for (channel, &n) in packed.0.iter_mut().zip(layout.bits.iter()) {
        let mask = payload_mask(n);
        *channel = (*channel & !mask) | ((word >> shift) as u8 & mask);
        shift += u32::from(n);
    }

    packed
}

/// 从一个像素中读出其承载的载荷字节，`pack_pixel` 的逆运算。
pub fn unpack_pixel(pixel: Rgb<u8>, layout: &BitLayout) -> Vec<u8> {
    let mut word = 0u32;
    let mut shift = 0;
    for (&channel, &n) in pixel.0.iter().zip(layout.bits.iter()) {
        word |= u32::from(channel & payload_mask(n)) << shift;
        shift += u32::from(n);
    }

    word.to_le_bytes()[..layout.bytes_per_pixel()].to_vec()
}

/// 给定尺寸的画布在该布局下可容纳的载荷字节数。
pub fn capacity(width: u32, height: u32, layout: &BitLayout) -> usize {
    width as usize * height as usize * layout.bytes_per_pixel()
}

/// 按遍历顺序生成所有像素坐标 `(x, y)`。
pub fn coordinates(
    width: u32,
    height: u32,
    traversal: Traversal,
) -> impl Iterator<Item = (u32, u32)> {
    let (width, height) = (u64::from(width), u64::from(height));
    (0..width * height).map(move |k| match traversal {
        Traversal::Rows => ((k % width) as u32, (k / width) as u32),
        Traversal::Columns => ((k / height) as u32, (k % height) as u32),
    })
}

/// 将载荷循环写入载体的每一个像素。
///
/// 写入的字节流为 `payload[k % payload.len()]`，`k` 取 `0..capacity`：
/// 短载荷被重复写入，超出容量的载荷被截断。
///
/// # Errors
///
/// * 载荷短于 2 字节。
/// * 载体不含任何像素。
pub fn embed(
    cover: &mut RgbImage,
    payload: &[u8],
    layout: &BitLayout,
    traversal: Traversal,
) -> Result<EmbedSummary, io::Error> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The payload must be at least {MIN_PAYLOAD_LEN} bytes long, got {}.",
                payload.len()
            ),
        ));
    }

    let (width, height) = cover.dimensions();
    let capacity = capacity(width, height, layout);
    if capacity == 0 {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "The cover image contains no pixels.",
        ));
    }

    let mut chunk = vec![0u8; layout.bytes_per_pixel()];
    let mut cursor = 0;
    for (x, y) in coordinates(width, height, traversal) {
        for slot in chunk.iter_mut() {
            *slot = payload[cursor];
            cursor = (cursor + 1) % payload.len();
        }

        let pixel = cover.get_pixel_mut(x, y);
        *pixel = pack_pixel(*pixel, &chunk, layout);
    }

    Ok(EmbedSummary {
        capacity,
        payload_len: payload.len(),
        embedded: payload.len().min(capacity),
        passes: capacity / payload.len(),
        tail: capacity % payload.len(),
    })
}
