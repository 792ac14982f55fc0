/// Set the `bit_index` bit in `num` to `value`.
///
/// # Example
/// ```
/// use qteleport::utils::set_bit;
///
/// assert_eq!(set_bit(0b000, 1, true), 0b010);
/// assert_eq!(set_bit(0b111, 0, false), 0b110);
/// ```
#[inline]
pub fn set_bit(num: usize, bit_index: usize, value: bool) -> usize {
    let v = 1 << bit_index;
    if value {
        num | v
    } else {
        num & !v
    }
}

/// Get the `bit_index` bit value from `num`.
///
/// # Example
/// ```
/// use qteleport::utils::get_bit;
///
/// assert!(get_bit(0b100, 2));
/// assert!(!get_bit(0b100, 1));
/// ```
#[inline]
pub fn get_bit(num: usize, bit_index: usize) -> bool {
    ((num >> bit_index) & 1) != 0
}

/// Number of bits in a machine word, the widest classical bit field an outcome can hold.
pub const WORD_BITS: usize = usize::BITS as usize;

/// A mask of the lowest `width` bits, saturating at a full word.
///
/// # Example
///
/// ```
/// use qteleport::utils::{low_mask, WORD_BITS};
///
/// assert_eq!(low_mask(3), 0b111);
/// assert_eq!(low_mask(WORD_BITS), usize::MAX);
/// ```
#[inline]
pub fn low_mask(width: usize) -> usize {
    match width {
        0 => 0,
        w if w >= WORD_BITS => usize::MAX,
        w => usize::MAX >> (WORD_BITS - w),
    }
}

/// Extracts `width` bits starting at `offset`. Bits beyond the word read as zero.
///
/// # Example
///
/// ```
/// use qteleport::utils::extract_bits;
///
/// assert_eq!(extract_bits(0b1011_0, 1, 3), 0b011);
/// ```
#[inline]
pub fn extract_bits(num: usize, offset: usize, width: usize) -> usize {
    let shifted = u32::try_from(offset)
        .ok()
        .and_then(|o| num.checked_shr(o))
        .unwrap_or(0);
    shifted & low_mask(width)
}

/// Formats the lowest `n` bits of `num` with the most significant bit first.
///
/// # Example
///
/// ```
/// use qteleport::utils::bit_string;
///
/// assert_eq!(bit_string(0b001, 3), "001");
/// assert_eq!(bit_string(0b110, 3), "110");
/// ```
pub fn bit_string(num: usize, n: usize) -> String {
    (0..n)
        .rev()
        .map(|i| if get_bit(num, i) { '1' } else { '0' })
        .collect()
}

/// Parses a most-significant-first bit string, the inverse of [`bit_string`].
///
/// Strings longer than [`WORD_BITS`] are rejected.
pub fn parse_bit_string(s: &str) -> Option<usize> {
    if s.len() > WORD_BITS {
        return None;
    }
    s.chars().try_fold(0usize, |acc, c| match c {
        '0' => Some(acc << 1),
        '1' => Some((acc << 1) | 1),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_round_trip() {
        for n in 1..6 {
            for x in 0..(1 << n) {
                assert_eq!(parse_bit_string(&bit_string(x, n)), Some(x));
            }
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_bit_string("01a"), None);
        assert_eq!(parse_bit_string(""), Some(0));
    }

    #[test]
    fn test_parse_full_word_only() {
        let ones = "1".repeat(WORD_BITS);
        assert_eq!(parse_bit_string(&ones), Some(usize::MAX));
        let long = format!("1{}", "0".repeat(WORD_BITS));
        assert_eq!(parse_bit_string(&long), None);
    }

    #[test]
    fn test_extract_full_word() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(WORD_BITS - 1), usize::MAX >> 1);
        assert_eq!(extract_bits(usize::MAX, 0, WORD_BITS), usize::MAX);
        assert_eq!(extract_bits(usize::MAX, 1, WORD_BITS), usize::MAX >> 1);
        assert_eq!(extract_bits(usize::MAX, WORD_BITS, 1), 0);
        assert_eq!(extract_bits(0b1100, 2, WORD_BITS + 5), 0b11);
    }
}
