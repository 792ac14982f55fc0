use std::collections::BTreeMap;
use std::fmt;

use crate::circuit::ClassicalRegister;
use crate::errors::{CircuitError, CircuitResult};
use crate::utils::{bit_string, parse_bit_string, WORD_BITS};

/// Histogram of classical outcomes over a number of shots.
///
/// Outcomes are keyed by the whole classical bit field. Keys print with the highest classical bit
/// first, so the last register allocated is leftmost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    num_clbits: usize,
    counts: BTreeMap<usize, usize>,
}

impl OutcomeCounts {
    /// An empty histogram over `num_clbits` classical bits.
    pub fn new(num_clbits: usize) -> Self {
        Self {
            num_clbits,
            counts: BTreeMap::new(),
        }
    }

    /// Build from `(bit string, count)` pairs.
    ///
    /// # Example
    /// ```
    /// use qteleport::counts::OutcomeCounts;
    ///
    /// let counts = OutcomeCounts::from_bit_strings([("100", 3), ("011", 5)]).unwrap();
    /// assert_eq!(counts.shots(), 8);
    /// assert_eq!(counts.get("011"), 5);
    /// assert_eq!(counts.get("000"), 0);
    /// ```
    pub fn from_bit_strings<'a, It>(entries: It) -> CircuitResult<Self>
    where
        It: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut width = None;
        let mut counts = BTreeMap::new();
        for (key, count) in entries {
            let w = *width.get_or_insert(key.len());
            if key.len() != w || key.is_empty() {
                return Err(CircuitError::parameter(format!(
                    "outcome {:?} does not have {} bits",
                    key, w
                )));
            }
            if w > WORD_BITS {
                return Err(CircuitError::parameter(format!(
                    "outcome {:?} has {} bits, more than the {} an outcome can hold",
                    key, w, WORD_BITS
                )));
            }
            let bits = parse_bit_string(key).ok_or_else(|| {
                CircuitError::parameter(format!("outcome {:?} is not a bit string", key))
            })?;
            *counts.entry(bits).or_insert(0) += count;
        }
        Ok(Self {
            num_clbits: width.unwrap_or(0),
            counts,
        })
    }

    /// Count one more occurrence of `bits`.
    pub fn record(&mut self, bits: usize) {
        self.add(bits, 1)
    }

    /// Count `n` more occurrences of `bits`.
    pub fn add(&mut self, bits: usize, n: usize) {
        if n > 0 {
            *self.counts.entry(bits).or_insert(0) += n;
        }
    }

    /// Number of classical bits in each outcome.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Occurrences of the outcome printed as `key`.
    pub fn get(&self, key: &str) -> usize {
        parse_bit_string(key)
            .filter(|_| key.len() == self.num_clbits)
            .and_then(|bits| self.counts.get(&bits).copied())
            .unwrap_or(0)
    }

    /// Occurrences of the outcome with classical bit field `bits`.
    pub fn get_bits(&self, bits: usize) -> usize {
        self.counts.get(&bits).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn shots(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(bit field, count)` pairs in ascending order.
    pub fn iter_bits(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// `(bit string, count)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.iter_bits()
            .map(move |(k, v)| (bit_string(k, self.num_clbits), v))
    }

    /// Counts of each value held by `register`, summed over the other bits.
    pub fn marginal(&self, register: &ClassicalRegister) -> BTreeMap<usize, usize> {
        self.iter_bits()
            .fold(BTreeMap::new(), |mut acc, (bits, count)| {
                *acc.entry(register.read(bits)).or_insert(0) += count;
                acc
            })
    }

    /// Every count multiplied by `k`.
    pub fn scaled(&self, k: usize) -> Self {
        Self {
            num_clbits: self.num_clbits,
            counts: self
                .counts
                .iter()
                .filter(|_| k > 0)
                .map(|(bits, count)| (*bits, count * k))
                .collect(),
        }
    }
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", key, count)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use std::num::NonZeroUsize;

    #[test]
    fn test_keys_wider_than_word_rejected() {
        let full = "1".repeat(WORD_BITS);
        let counts = OutcomeCounts::from_bit_strings([(full.as_str(), 2)]).unwrap();
        assert_eq!(counts.get_bits(usize::MAX), 2);

        // These differ only in the top bit, which would be shifted out of a word.
        let a = format!("1{}", "0".repeat(WORD_BITS));
        let b = format!("0{}", "0".repeat(WORD_BITS));
        let err = OutcomeCounts::from_bit_strings([(a.as_str(), 1), (b.as_str(), 1)]).unwrap_err();
        assert!(matches!(err, CircuitError::InvalidParameter(_)));
        assert_eq!(counts.get(&a), 0);
    }

    #[test]
    fn test_record_and_display() {
        let mut counts = OutcomeCounts::new(3);
        counts.record(0b001);
        counts.record(0b001);
        counts.add(0b110, 3);
        counts.add(0b111, 0);
        assert_eq!(counts.shots(), 5);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("001"), 2);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.to_string(), "{'001': 2, '110': 3}");
    }

    #[test]
    fn test_from_bit_strings_rejects_mixed_widths() {
        assert!(OutcomeCounts::from_bit_strings([("00", 1), ("000", 1)]).is_err());
        assert!(OutcomeCounts::from_bit_strings([("0x1", 1)]).is_err());
        let empty = OutcomeCounts::from_bit_strings(std::iter::empty()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_marginal() {
        let one = NonZeroUsize::new(1).unwrap();
        let mut b = CircuitBuilder::<f64>::new(one);
        let low = b.classical_register("low", one).unwrap();
        let high = b.classical_register("high", NonZeroUsize::new(2).unwrap()).unwrap();

        let counts =
            OutcomeCounts::from_bit_strings([("000", 1), ("001", 2), ("101", 4), ("110", 8)])
                .unwrap();
        let low_m = counts.marginal(&low);
        assert_eq!(low_m.get(&0), Some(&9));
        assert_eq!(low_m.get(&1), Some(&6));
        let high_m = counts.marginal(&high);
        assert_eq!(high_m.get(&0b00), Some(&3));
        assert_eq!(high_m.get(&0b10), Some(&4));
        assert_eq!(high_m.get(&0b11), Some(&8));
    }

    #[test]
    fn test_scaled() {
        let counts = OutcomeCounts::from_bit_strings([("0", 3), ("1", 1)]).unwrap();
        let scaled = counts.scaled(4);
        assert_eq!(scaled.shots(), 16);
        assert_eq!(scaled.get("0"), 12);
        assert!(counts.scaled(0).is_empty());
    }
}
