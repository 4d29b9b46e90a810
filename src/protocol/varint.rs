//! Base-128 varint 长度前缀 (protobuf 编码)

use crate::error::VarintError;

/// u64 的最长编码字节数
pub const MAX_VARINT_LEN: usize = 10;

/// 解码 `buf` 开头的 varint。
///
/// 缓冲区在结束字节之前用完时返回 `Ok(None)`，
/// 完整时返回 `Ok(Some((value, prefix_size)))`。
pub fn decode_varint(buf: &[u8]) -> Result<Option<(u64, usize)>, VarintError> {
    let mut value: u64 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }
        let bits = u64::from(byte & 0x7f);
        // 第 10 个字节只能携带 u64 的最高位
        if i == MAX_VARINT_LEN - 1 && bits > 1 {
            return Err(VarintError::Overflow);
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }

    if buf.len() >= MAX_VARINT_LEN {
        return Err(VarintError::Overflow);
    }
    Ok(None)
}

/// 把 `value` 的 varint 编码追加到 `out`
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// `encode_varint` 会输出的字节数
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint(value, &mut out);
        out
    }

    #[test]
    fn test_round_trip_boundaries() {
        let samples = [
            0u64,
            1,
            127,
            128,
            300,
            16_383,
            16_384,
            2_097_151,
            u32::MAX as u64,
            u64::MAX >> 1,
            u64::MAX,
        ];
        for value in samples {
            let bytes = encode(value);
            assert_eq!(bytes.len(), encoded_len(value), "len for {}", value);
            assert_eq!(decode_varint(&bytes), Ok(Some((value, bytes.len()))));
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        assert_eq!(decode_varint(&[0xac, 0x02, 0xff, 0x00]), Ok(Some((300, 2))));
    }

    #[test]
    fn test_incomplete_prefix() {
        assert_eq!(decode_varint(&[]), Ok(None));
        assert_eq!(decode_varint(&[0x80]), Ok(None));
        assert_eq!(decode_varint(&[0xff, 0xff, 0xff]), Ok(None));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(decode_varint(&[0xff; 11]), Err(VarintError::Overflow));
        assert_eq!(decode_varint(&[0xff; 10]), Err(VarintError::Overflow));

        let mut too_big = vec![0xff; 9];
        too_big.push(0x02);
        assert_eq!(decode_varint(&too_big), Err(VarintError::Overflow));
    }
}
