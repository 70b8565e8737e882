/// 注册回调或序列时可能出现的错误。
///
/// 所有表都是固定容量的，不做动态分配；识别过程本身不会失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// 回调表已满，无法再添加新的键。
    RegistryFull,
    /// 序列表已满，无法再添加新的序列。
    SequencesFull,
    /// 序列长度超过了历史缓冲区的容量。
    PatternTooLong,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::RegistryFull => f.write_str("callback registry is full"),
            Error::SequencesFull => f.write_str("sequence table is full"),
            Error::PatternTooLong => f.write_str("sequence pattern exceeds history capacity"),
        }
    }
}
