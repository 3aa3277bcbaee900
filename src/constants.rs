/// 消息结束标记 `1111111111111110`，追加在载荷比特流的末尾。
pub const TERMINATOR: [u8; TERMINATOR_BITS] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// 结束标记的比特数。
pub const TERMINATOR_BITS: usize = 16;

/// 每个字符占用的比特数。
/// 字符按码点的低字节处理，因此只支持 0..=255 范围内的码点。
pub const BITS_PER_CHAR: usize = 8;

/// 每个像素可用于隐写的通道数 (R, G, B)，每个通道 1 bit。
/// Alpha 通道不计入容量，也不会被修改。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 未指定输出路径时，隐写结果文件名的前缀。
pub const STEGO_PREFIX: &str = "stego_";

/// 隐写结果总是以 PNG 保存，避免有损压缩破坏最低有效位。
pub const STEGO_EXTENSION: &str = "png";

/// 后台任务线程的名称。
pub const WORKER_THREAD_NAME: &str = "lsb-worker";
