//! # pixel_embed 库
//!
//! 本库包含像素低位嵌入工具的核心逻辑。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod cover;
pub mod handler;
pub mod steganography;
