//! Binary array decoding for peak list documents
//!
//! Per-peak arrays (scan numbers, m/z values, intensities) are stored as
//! Base64-encoded fixed-width binary data embedded as element text. The
//! decoding pipeline is:
//!
//! 1. Strip whitespace left over from XML formatting
//! 2. Base64 decode the text
//! 3. Read `count` consecutive 4-byte big-endian values
//!
//! The element count is never derived from the payload: it is declared
//! earlier in the document and passed in by the caller.

use std::io::Cursor;

use base64::prelude::*;
use byteorder::{BigEndian, ReadBytesExt};

/// Width in bytes of every encoded value
pub const VALUE_WIDTH: usize = 4;

/// Errors that can occur during binary decoding
#[derive(Debug, thiserror::Error)]
pub enum BinaryDecodeError {
    /// Text is not valid Base64
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Fewer bytes than the declared count requires
    #[error("Truncated array: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the declared count
        expected: usize,
        /// Bytes actually decoded
        actual: usize,
    },

    /// More bytes than the declared count requires (strict decoders only)
    #[error("Array has trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes {
        /// Bytes required by the declared count
        expected: usize,
        /// Bytes actually decoded
        actual: usize,
    },

    /// Declared count too large to address
    #[error("Declared element count {0} overflows the addressable byte length")]
    CountOverflow(usize),
}

/// Decoder for peak list binary arrays
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryDecoder {
    strict_length: bool,
}

impl BinaryDecoder {
    /// Decoder that tolerates bytes beyond `4 * count`
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder that rejects any payload whose length is not exactly `4 * count`
    pub fn strict() -> Self {
        Self {
            strict_length: true,
        }
    }

    /// Whether trailing bytes are rejected
    pub fn is_strict(&self) -> bool {
        self.strict_length
    }

    /// Decode a Base64 blob into `count` big-endian 32-bit integers
    pub fn decode_i32(&self, base64_data: &str, count: usize) -> Result<Vec<i32>, BinaryDecodeError> {
        let bytes = self.decode_bytes(base64_data, count)?;
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(cursor.read_i32::<BigEndian>().map_err(|_| {
                BinaryDecodeError::Truncated {
                    expected: count * VALUE_WIDTH,
                    actual: bytes.len(),
                }
            })?);
        }
        Ok(values)
    }

    /// Decode a Base64 blob into `count` big-endian 32-bit floats widened to f64
    pub fn decode_f32_as_f64(
        &self,
        base64_data: &str,
        count: usize,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        let bytes = self.decode_bytes(base64_data, count)?;
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let val = cursor.read_f32::<BigEndian>().map_err(|_| {
                BinaryDecodeError::Truncated {
                    expected: count * VALUE_WIDTH,
                    actual: bytes.len(),
                }
            })?;
            values.push(val as f64);
        }
        Ok(values)
    }

    /// Base64 decode and check the byte length against the declared count
    fn decode_bytes(&self, base64_data: &str, count: usize) -> Result<Vec<u8>, BinaryDecodeError> {
        let expected = count
            .checked_mul(VALUE_WIDTH)
            .ok_or(BinaryDecodeError::CountOverflow(count))?;

        let cleaned: String = base64_data
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = if cleaned.is_empty() {
            Vec::new()
        } else {
            BASE64_STANDARD.decode(cleaned.as_bytes())?
        };

        if bytes.len() < expected {
            return Err(BinaryDecodeError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            if self.strict_length {
                return Err(BinaryDecodeError::TrailingBytes {
                    expected,
                    actual: bytes.len(),
                });
            }
            log::debug!(
                "Ignoring {} trailing bytes after {} array values",
                bytes.len() - expected,
                count
            );
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_i32(values: &[i32]) -> String {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        BASE64_STANDARD.encode(bytes)
    }

    #[test]
    fn test_decode_int32() {
        // 1, 256, -1 in big-endian
        let bytes: [u8; 12] = [
            0x00, 0x00, 0x00, 0x01, // 1
            0x00, 0x00, 0x01, 0x00, // 256
            0xff, 0xff, 0xff, 0xff, // -1
        ];
        let base64_data = BASE64_STANDARD.encode(bytes);

        let result = BinaryDecoder::new().decode_i32(&base64_data, 3).unwrap();
        assert_eq!(result, vec![1, 256, -1]);
    }

    #[test]
    fn test_decode_float32_widened() {
        // 100.0 and 200.0 as big-endian f32
        let bytes: [u8; 8] = [
            0x42, 0xc8, 0x00, 0x00, // 100.0
            0x43, 0x48, 0x00, 0x00, // 200.0
        ];
        let base64_data = BASE64_STANDARD.encode(bytes);

        let result = BinaryDecoder::new()
            .decode_f32_as_f64(&base64_data, 2)
            .unwrap();
        assert_eq!(result.len(), 2);
        assert!((result[0] - 100.0).abs() < 1e-10);
        assert!((result[1] - 200.0).abs() < 1e-10);
    }

    #[test]
    fn test_decode_strips_formatting_whitespace() {
        let encoded = encode_i32(&[7, 8, 9, 10]);
        let (head, tail) = encoded.split_at(6);
        let formatted = format!("\n\t  {}\r\n\t{}  \n", head, tail);

        let result = BinaryDecoder::new().decode_i32(&formatted, 4).unwrap();
        assert_eq!(result, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_decode_truncated() {
        let encoded = encode_i32(&[1, 2]);
        let err = BinaryDecoder::new().decode_i32(&encoded, 3).unwrap_err();
        assert!(matches!(
            err,
            BinaryDecodeError::Truncated {
                expected: 12,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_decode_invalid_base64() {
        let err = BinaryDecoder::new()
            .decode_f32_as_f64("not*valid*base64!", 1)
            .unwrap_err();
        assert!(matches!(err, BinaryDecodeError::Base64Error(_)));
    }

    #[test]
    fn test_trailing_bytes_tolerated_unless_strict() {
        let encoded = encode_i32(&[1, 2, 3]);

        let lenient = BinaryDecoder::new().decode_i32(&encoded, 2).unwrap();
        assert_eq!(lenient, vec![1, 2]);

        let err = BinaryDecoder::strict().decode_i32(&encoded, 2).unwrap_err();
        assert!(matches!(err, BinaryDecodeError::TrailingBytes { .. }));
    }

    #[test]
    fn test_decode_empty() {
        let result = BinaryDecoder::new().decode_i32("", 0).unwrap();
        assert!(result.is_empty());

        let err = BinaryDecoder::new().decode_f32_as_f64("  \n", 1).unwrap_err();
        assert!(matches!(err, BinaryDecodeError::Truncated { .. }));
    }
}
