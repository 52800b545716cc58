//! UTF-8 decoding into Unicode code points.

use thiserror::Error;

use super::node::CodePoint;

/// How byte sequences that are not well-formed UTF-8 are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecodeMode {
    /// Trusts the input.
    ///
    /// The sequence length is taken from the top nibble of the lead byte
    /// (`0xF_` four bytes, `0xE_` three, `0xC_`/`0xD_` two, anything else one)
    /// and the low bits of the following bytes are concatenated without
    /// looking at their tags. Overlong forms, surrogates and stray
    /// continuation bytes all decode to some code point. Only a sequence that
    /// runs past the end of the input is an error.
    #[default]
    Permissive,
    /// Accepts well-formed UTF-8 only.
    Strict,
}

/// A byte sequence that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ends inside a sequence.
    #[error("truncated {expected}-byte sequence at byte {offset}")]
    Truncated {
        /// Start of the sequence.
        offset: usize,
        /// Length announced by the lead byte.
        expected: usize,
    },

    /// A byte that cannot start a sequence.
    #[error("invalid lead byte {byte:#04x} at byte {offset}")]
    InvalidLead {
        /// Position of the byte.
        offset: usize,
        /// The byte.
        byte: u8,
    },

    /// A byte inside a sequence lacks the `10` tag.
    #[error("invalid continuation byte {byte:#04x} at byte {offset}")]
    InvalidContinuation {
        /// Position of the byte.
        offset: usize,
        /// The byte.
        byte: u8,
    },

    /// A sequence longer than its code point needs.
    #[error("overlong encoding of U+{code_point:04X} at byte {offset}")]
    Overlong {
        /// Start of the sequence.
        offset: usize,
        /// The decoded value.
        code_point: CodePoint,
    },

    /// A surrogate or a value above U+10FFFF.
    #[error("U+{code_point:04X} at byte {offset} is not a Unicode scalar value")]
    NotScalar {
        /// Start of the sequence.
        offset: usize,
        /// The decoded value.
        code_point: CodePoint,
    },
}

/// Smallest code point that needs a sequence of the given length.
const MIN_FOR_LEN: [CodePoint; 5] = [0, 0, 0x80, 0x800, 0x1_0000];

/// Decodes the code point starting at `*offset` and advances `offset` past it.
///
/// On error `offset` is left unchanged.
pub fn decode_next(
    bytes: &[u8],
    offset: &mut usize,
    mode: DecodeMode,
) -> Result<CodePoint, DecodeError> {
    let start = *offset;
    let lead = *bytes.get(start).ok_or(DecodeError::Truncated {
        offset: start,
        expected: 1,
    })?;
    let strict = mode == DecodeMode::Strict;

    let (len, payload) = match lead >> 4 {
        0xF => (4, lead & 0x07),
        0xE => (3, lead & 0x0F),
        0xC | 0xD => (2, lead & 0x1F),
        _ => (1, lead & 0x7F),
    };
    if strict && ((0x80..0xC0).contains(&lead) || lead >= 0xF8) {
        return Err(DecodeError::InvalidLead {
            offset: start,
            byte: lead,
        });
    }

    let tail = bytes
        .get(start + 1..start + len)
        .ok_or(DecodeError::Truncated {
            offset: start,
            expected: len,
        })?;
    let mut code_point = CodePoint::from(payload);
    for (i, &byte) in tail.iter().enumerate() {
        if strict && byte & 0xC0 != 0x80 {
            return Err(DecodeError::InvalidContinuation {
                offset: start + 1 + i,
                byte,
            });
        }
        code_point = (code_point << 6) | CodePoint::from(byte & 0x3F);
    }

    if strict {
        if code_point < MIN_FOR_LEN[len] {
            return Err(DecodeError::Overlong {
                offset: start,
                code_point,
            });
        }
        if char::from_u32(code_point).is_none() {
            return Err(DecodeError::NotScalar {
                offset: start,
                code_point,
            });
        }
    }

    *offset = start + len;
    Ok(code_point)
}

/// Iterator over the code points of a byte string.
///
/// Stops after the first error.
#[derive(Clone, Debug)]
pub struct CodePoints<'a> {
    bytes: &'a [u8],
    offset: usize,
    mode: DecodeMode,
}

impl CodePoints<'_> {
    /// Byte offset of the next sequence to decode.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for CodePoints<'_> {
    type Item = Result<CodePoint, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        let res = decode_next(self.bytes, &mut self.offset, self.mode);
        if res.is_err() {
            self.offset = self.bytes.len();
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() - self.offset;
        (remaining.div_ceil(4), Some(remaining))
    }
}

/// Returns an iterator decoding `bytes` into code points.
pub fn code_points(bytes: &[u8], mode: DecodeMode) -> CodePoints<'_> {
    CodePoints {
        bytes,
        offset: 0,
        mode,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode_all(bytes: &[u8], mode: DecodeMode) -> Result<Vec<CodePoint>, DecodeError> {
        code_points(bytes, mode).collect()
    }

    #[test]
    fn each_sequence_length() {
        for mode in [DecodeMode::Permissive, DecodeMode::Strict] {
            assert_eq!(decode_all(b"a", mode), Ok(vec![0x61]));
            assert_eq!(decode_all(&[0xC3, 0xA9], mode), Ok(vec![0xE9]));
            assert_eq!(decode_all(&[0xE2, 0x82, 0xAC], mode), Ok(vec![0x20AC]));
            assert_eq!(
                decode_all(&[0xF0, 0x9F, 0x98, 0x80], mode),
                Ok(vec![0x1F600])
            );
        }
    }

    #[test]
    fn advances_offset_by_sequence_length() {
        let bytes = "aé€😀".as_bytes();
        let mut offset = 0;
        let mut steps = Vec::new();
        while offset < bytes.len() {
            let before = offset;
            decode_next(bytes, &mut offset, DecodeMode::Permissive).unwrap();
            steps.push(offset - before);
        }
        assert_eq!(steps, [1, 2, 3, 4]);
    }

    #[test]
    fn agrees_with_std_on_valid_utf8() {
        let text = "Ärger über Straße, 授人以鱼不如授人以渔 \u{10FFFF}\u{7F}\u{80}\u{7FF}\u{800}\u{FFFF}\u{10000}";
        let expected: Vec<CodePoint> = text.chars().map(CodePoint::from).collect();
        assert_eq!(decode_all(text.as_bytes(), DecodeMode::Permissive).unwrap(), expected);
        assert_eq!(decode_all(text.as_bytes(), DecodeMode::Strict).unwrap(), expected);
    }

    #[test]
    fn permissive_ignores_continuation_tags() {
        assert_eq!(decode_all(&[0xC3, 0x41], DecodeMode::Permissive), Ok(vec![0xC1]));
    }

    #[test]
    fn permissive_masks_stray_bytes() {
        assert_eq!(decode_all(&[0x80], DecodeMode::Permissive), Ok(vec![0x00]));
        assert_eq!(decode_all(&[0xBF], DecodeMode::Permissive), Ok(vec![0x3F]));
        assert_eq!(
            decode_all(&[0xFF, 0x80, 0x80, 0x80], DecodeMode::Permissive),
            Ok(vec![0x1C_0000])
        );
    }

    #[test]
    fn permissive_accepts_overlong_and_surrogates() {
        assert_eq!(decode_all(&[0xC0, 0x80], DecodeMode::Permissive), Ok(vec![0]));
        assert_eq!(
            decode_all(&[0xED, 0xA0, 0x80], DecodeMode::Permissive),
            Ok(vec![0xD800])
        );
    }

    #[test]
    fn truncated_sequence_is_an_error_in_both_modes() {
        for mode in [DecodeMode::Permissive, DecodeMode::Strict] {
            assert_eq!(
                decode_all(&[0x61, 0xE2, 0x82], mode),
                Err(DecodeError::Truncated {
                    offset: 1,
                    expected: 3
                })
            );
        }
    }

    #[test]
    fn offset_unchanged_on_error() {
        let mut offset = 0;
        let res = decode_next(&[0xF0, 0x9F], &mut offset, DecodeMode::Permissive);
        assert!(res.is_err());
        assert_eq!(offset, 0);
    }

    #[test]
    fn strict_rejects_malformed_input() {
        let strict = DecodeMode::Strict;
        assert_eq!(
            decode_all(&[0x80], strict),
            Err(DecodeError::InvalidLead {
                offset: 0,
                byte: 0x80
            })
        );
        assert_eq!(
            decode_all(&[0xF8, 0x80, 0x80, 0x80], strict),
            Err(DecodeError::InvalidLead {
                offset: 0,
                byte: 0xF8
            })
        );
        assert_eq!(
            decode_all(&[0xC3, 0x41], strict),
            Err(DecodeError::InvalidContinuation {
                offset: 1,
                byte: 0x41
            })
        );
        assert_eq!(
            decode_all(&[0xC0, 0x80], strict),
            Err(DecodeError::Overlong {
                offset: 0,
                code_point: 0
            })
        );
        assert_eq!(
            decode_all(&[0xED, 0xA0, 0x80], strict),
            Err(DecodeError::NotScalar {
                offset: 0,
                code_point: 0xD800
            })
        );
        assert_eq!(
            decode_all(&[0xF4, 0x90, 0x80, 0x80], strict),
            Err(DecodeError::NotScalar {
                offset: 0,
                code_point: 0x11_0000
            })
        );
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut it = code_points(&[0x80, 0x61], DecodeMode::Strict);
        assert!(matches!(it.next(), Some(Err(_))));
        assert_eq!(it.next(), None);
    }
}
