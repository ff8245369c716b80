// SPDX-License-Identifier: Apache-2.0

//! Arbitrary-width unsigned bit values, used for constant wires and for
//! simulation results.

use std::fmt;

use bitvec::vec::BitVec;

/// A fixed-width bit vector where index 0 is the least significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bits {
    bits: BitVec,
}

impl Bits {
    pub fn zero(bit_count: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, bit_count),
        }
    }

    pub fn bool(value: bool) -> Self {
        Self::from_lsb_is_0(&[value])
    }

    /// Creates a value of the given width from an unsigned integer, failing if
    /// the integer does not fit in `bit_count` bits.
    pub fn make_ubits(bit_count: usize, value: u64) -> Result<Self, String> {
        if bit_count < 64 && (value >> bit_count) != 0 {
            return Err(format!(
                "value {} does not fit in {} bits",
                value, bit_count
            ));
        }
        let bits = (0..bit_count)
            .map(|i| i < 64 && (value >> i) & 1 == 1)
            .collect::<BitVec>();
        Ok(Self { bits })
    }

    pub fn from_lsb_is_0(bits: &[bool]) -> Self {
        Self {
            bits: bits.iter().copied().collect(),
        }
    }

    pub fn get_bit_count(&self) -> usize {
        self.bits.len()
    }

    pub fn get_bit(&self, index: usize) -> bool {
        assert!(
            index < self.bits.len(),
            "index {} is out of bounds for bits of width {}",
            index,
            self.bits.len()
        );
        self.bits[index]
    }

    pub fn iter_lsb_to_msb(&self) -> impl DoubleEndedIterator<Item = bool> + '_ {
        self.bits.iter().map(|b| *b)
    }

    /// Returns the value as a `u64`, or `None` if any bit at index 64 or above
    /// is set.
    pub fn to_u64(&self) -> Option<u64> {
        let mut value = 0u64;
        for (i, bit) in self.iter_lsb_to_msb().enumerate() {
            if !bit {
                continue;
            }
            if i >= 64 {
                return None;
            }
            value |= 1 << i;
        }
        Some(value)
    }

    pub fn is_zero(&self) -> bool {
        self.bits.not_any()
    }

    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            bits: self.iter_lsb_to_msb().map(|b| !b).collect(),
        }
    }

    #[must_use]
    pub fn and(&self, rhs: &Bits) -> Self {
        self.zip_with(rhs, |a, b| a & b)
    }

    #[must_use]
    pub fn or(&self, rhs: &Bits) -> Self {
        self.zip_with(rhs, |a, b| a | b)
    }

    #[must_use]
    pub fn xor(&self, rhs: &Bits) -> Self {
        self.zip_with(rhs, |a, b| a ^ b)
    }

    fn zip_with(&self, rhs: &Bits, f: impl Fn(bool, bool) -> bool) -> Self {
        assert_eq!(
            self.get_bit_count(),
            rhs.get_bit_count(),
            "bitwise operation on mismatched widths"
        );
        Self {
            bits: self
                .iter_lsb_to_msb()
                .zip(rhs.iter_lsb_to_msb())
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }

    /// Parses either a `0b`-prefixed binary literal (MSb first) or a decimal
    /// literal at the given width.
    pub fn parse(text: &str, bit_count: usize) -> Result<Self, String> {
        let text = text.trim();
        if let Some(digits) = text.strip_prefix("0b") {
            let digits: Vec<char> = digits.chars().filter(|c| *c != '_').collect();
            if digits.len() > bit_count
                && digits[..digits.len() - bit_count].iter().any(|c| *c != '0')
            {
                return Err(format!(
                    "binary literal {} does not fit in {} bits",
                    text, bit_count
                ));
            }
            let mut bits = BitVec::repeat(false, bit_count);
            for (i, c) in digits.iter().rev().enumerate() {
                let bit = match c {
                    '0' => false,
                    '1' => true,
                    _ => return Err(format!("invalid binary digit '{}' in {}", c, text)),
                };
                if i < bit_count {
                    bits.set(i, bit);
                }
            }
            return Ok(Self { bits });
        }
        let value = text
            .parse::<u64>()
            .map_err(|e| format!("invalid literal {}: {}", text, e))?;
        Self::make_ubits(bit_count, value)
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b")?;
        if self.bits.is_empty() {
            return write!(f, "0");
        }
        for bit in self.iter_lsb_to_msb().rev() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_ubits_and_bit_order() {
        let v = Bits::make_ubits(4, 0b0110).unwrap();
        assert!(!v.get_bit(0));
        assert!(v.get_bit(1));
        assert!(v.get_bit(2));
        assert!(!v.get_bit(3));
        assert_eq!(v.to_u64(), Some(6));
        assert_eq!(v.to_string(), "0b0110");
    }

    #[test]
    fn test_make_ubits_rejects_overflow() {
        assert!(Bits::make_ubits(2, 4).is_err());
        assert!(Bits::make_ubits(64, u64::MAX).is_ok());
    }

    #[test]
    fn test_bitwise_ops() {
        let a = Bits::make_ubits(4, 0b0011).unwrap();
        let b = Bits::make_ubits(4, 0b0101).unwrap();
        assert_eq!(a.and(&b).to_u64(), Some(0b0001));
        assert_eq!(a.or(&b).to_u64(), Some(0b0111));
        assert_eq!(a.xor(&b).to_u64(), Some(0b0110));
        assert_eq!(a.not().to_u64(), Some(0b1100));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Bits::parse("0b101", 4).unwrap().to_u64(), Some(5));
        assert_eq!(Bits::parse("0b0001", 2).unwrap().to_u64(), Some(1));
        assert_eq!(Bits::parse("12", 4).unwrap().to_u64(), Some(12));
        assert!(Bits::parse("0b100", 2).is_err());
        assert!(Bits::parse("0b12", 2).is_err());
        assert!(Bits::parse("17", 4).is_err());
    }

    #[test]
    fn test_wide_to_u64() {
        let mut bits = vec![false; 70];
        bits[69] = true;
        assert_eq!(Bits::from_lsb_is_0(&bits).to_u64(), None);
        bits[69] = false;
        bits[3] = true;
        assert_eq!(Bits::from_lsb_is_0(&bits).to_u64(), Some(8));
    }
}
