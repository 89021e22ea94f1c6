/// 默认输出图像路径 (位于当前工作目录)。
pub const DEFAULT_OUTPUT: &str = "output.png";

/// 载体图像默认的宽度和高度 (像素)。
pub const DEFAULT_SIZE: u32 = 1024;

/// 调色板量化时默认使用的颜色数。
pub const DEFAULT_PALETTE_COLORS: usize = 512;

/// 调色板颜色数的允许范围。
pub const MIN_PALETTE_COLORS: usize = 8;
pub const MAX_PALETTE_COLORS: usize = 4096;

/// 每个像素 R、G、B 通道默认承载的载荷位数。
/// 5 + 5 + 6 = 16 bits，即每个像素 2 个字节。
pub const DEFAULT_CHANNEL_BITS: [u8; 3] = [5, 5, 6];

/// 载荷的最小长度 (字节)。
pub const MIN_PAYLOAD_LEN: usize = 2;

/// NeuQuant 采样因子，1 为最精确，30 为最快。
pub const QUANT_SAMPLE_FACTOR: i32 = 10;
