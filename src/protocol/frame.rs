//! 帧组装器 - 从字节流中还原带长度前缀的帧

use bytes::{Buf, Bytes, BytesMut};

use super::varint::decode_varint;
use crate::error::FrameError;

/// 单帧声明长度的默认上限
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// 组装帧时使用的限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub max_frame_len: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// 累积字节并产出完整的 `varint(length) payload[length]` 帧。
///
/// 每次 [`feed`](Self::feed) 之后需要循环调用 [`FrameAssembler::extract_next`]：
/// 一次读取可能包含多帧，也可能只有下一帧的一部分。不完整的帧保留到数据到齐。
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: BytesMut,
    limits: FrameLimits,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: FrameLimits) -> Self {
        Self {
            buffer: BytesMut::new(),
            limits,
        }
    }

    /// 追加新读到的字节
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// 从缓冲区头部取出一帧完整的 payload。
    ///
    /// `Ok(None)` 表示暂时没有可用帧：前缀不完整、声明长度为 0 或 payload 未到齐。
    pub fn extract_next(&mut self) -> Result<Option<Bytes>, FrameError> {
        let Some((length, prefix_size)) = decode_varint(&self.buffer)? else {
            return Ok(None);
        };

        if length > self.limits.max_frame_len as u64 {
            return Err(FrameError::FrameTooLarge {
                declared: length,
                limit: self.limits.max_frame_len,
            });
        }

        let length = length as usize;
        if length == 0 || prefix_size + length > self.buffer.len() {
            return Ok(None);
        }

        self.buffer.advance(prefix_size);
        Ok(Some(self.buffer.split_to(length).freeze()))
    }

    /// 已缓存但尚未作为帧返回的字节数
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
