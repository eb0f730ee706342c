use super::SignedDigit;
use serde::{Deserialize, Serialize};

/// The non-adjacent form of an integer stored as two bit masks.
///
/// Bit $k$ of `negative` (resp. `positive`) is set when the digit of weight $2^k$ is $-1$
/// (resp. $1$). A bit is never set in both masks, and no two consecutive bits are set in their
/// union.
///
/// The masks are 128 bits wide since the non-adjacent form of a `u64` may need 65 digits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NafMasks {
    pub negative: u128,
    pub positive: u128,
}

impl NafMasks {
    /// Return the number of digits of the representation, i.e. the position of the most
    /// significant nonzero digit plus one.
    pub fn digit_count(&self) -> usize {
        (u128::BITS - (self.negative | self.positive).leading_zeros()) as usize
    }

    /// Return the number of nonzero digits, also called the weight of the representation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rotation_basis::sdr::encode_bitwise;
    /// // 15 = 16 - 1 needs two terms where its binary form needs four
    /// assert_eq!(encode_bitwise(15).nonzero_count(), 2);
    /// ```
    pub fn nonzero_count(&self) -> usize {
        (self.negative | self.positive).count_ones() as usize
    }

    /// Return the digits encoded by the masks, most significant first.
    ///
    /// The output is identical to the one of [`encode_iterative`](super::encode_iterative) for
    /// the same input.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rotation_basis::sdr::{encode_bitwise, encode_iterative};
    /// assert_eq!(encode_bitwise(3).digits(), vec![1, 0, -1]);
    /// assert_eq!(encode_bitwise(1234).digits(), encode_iterative(1234));
    /// ```
    pub fn digits(&self) -> Vec<SignedDigit> {
        (0..self.digit_count())
            .rev()
            .map(|bit| {
                let pos = (self.positive >> bit) & 1;
                let neg = (self.negative >> bit) & 1;
                pos as SignedDigit - neg as SignedDigit
            })
            .collect()
    }

    /// Return the nonzero terms $d\_k 2^k$ of the representation, in increasing order of
    /// magnitude.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rotation_basis::sdr::encode_bitwise;
    /// assert_eq!(encode_bitwise(7).terms(), vec![-1, 8]);
    /// assert_eq!(encode_bitwise(7).terms().iter().sum::<i128>(), 7);
    /// ```
    pub fn terms(&self) -> Vec<i128> {
        (0..self.digit_count())
            .filter_map(|bit| {
                if (self.positive >> bit) & 1 == 1 {
                    Some(1i128 << bit)
                } else if (self.negative >> bit) & 1 == 1 {
                    Some(-(1i128 << bit))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Recompose the value represented by the masks, see [`decode_masks`].
    pub fn value(&self) -> Option<i128> {
        decode_masks(self.negative, self.positive)
    }
}

impl From<NafMasks> for (u128, u128) {
    fn from(masks: NafMasks) -> Self {
        (masks.negative, masks.positive)
    }
}

impl From<(u128, u128)> for NafMasks {
    fn from((negative, positive): (u128, u128)) -> Self {
        Self { negative, positive }
    }
}

/// Compute the non-adjacent form of `input` without looping over its bits.
///
/// With $x\_h = \lfloor x/2 \rfloor$ and $x\_3 = x + x\_h$, the bits which differ between $x\_h$
/// and $x\_3$ are exactly the nonzero digits of the non-adjacent form of $x$: the ones set in
/// $x\_3$ are the positive digits, the ones set in $x\_h$ the negative digits.
///
/// # Example
///
/// ```rust
/// use rotation_basis::sdr::{decode_masks, encode_bitwise};
/// let masks = encode_bitwise(3);
/// // 3 = 4 - 1
/// assert_eq!(masks.positive, 0b100);
/// assert_eq!(masks.negative, 0b001);
/// assert_eq!(decode_masks(masks.negative, masks.positive), Some(3));
/// ```
pub fn encode_bitwise(input: u64) -> NafMasks {
    let x = u128::from(input);
    let x_half = x >> 1;
    let x_three_halves = x + x_half;
    let changed = x_half ^ x_three_halves;
    NafMasks {
        negative: x_half & changed,
        positive: x_three_halves & changed,
    }
}

/// Recompose the value encoded by a pair of negative and positive digit masks.
///
/// This is the inverse of [`encode_bitwise`]. Returns `None` if a bit is set in both masks or if
/// the value does not fit in an `i128`, which can only happen when bit 127 is set.
///
/// # Example
///
/// ```rust
/// use rotation_basis::sdr::decode_masks;
/// assert_eq!(decode_masks(0b001, 0b100), Some(3));
/// assert_eq!(decode_masks(1 << 127, 0), Some(i128::MIN));
/// assert_eq!(decode_masks(0, 1 << 127), None);
/// assert_eq!(decode_masks(0b1, 0b1), None);
/// ```
pub fn decode_masks(negative: u128, positive: u128) -> Option<i128> {
    if negative & positive != 0 {
        return None;
    }
    let (mut negative, mut positive) = (negative, positive);
    let mut value = 0i128;
    let mut place_value = 1u128;
    // Partial sums of the lower digits always fit, only the top digit can overflow
    while negative > 0 || positive > 0 {
        if negative & 1 == 1 {
            value = value.checked_sub_unsigned(place_value)?;
        } else if positive & 1 == 1 {
            value = value.checked_add_unsigned(place_value)?;
        }
        place_value <<= 1;
        negative >>= 1;
        positive >>= 1;
    }
    Some(value)
}
