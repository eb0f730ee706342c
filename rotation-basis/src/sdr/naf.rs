use super::SignedDigit;

/// Compute the non-adjacent form of `input`, one bit at a time.
///
/// The returned digits are ordered from the most significant to the least significant. The
/// leading digit is always nonzero, and `0` is represented by an empty sequence.
///
/// # Example
///
/// ```rust
/// use rotation_basis::sdr::{decode, encode_iterative};
/// // 7 = 8 - 1
/// assert_eq!(encode_iterative(7), vec![1, 0, 0, -1]);
/// assert_eq!(decode(&encode_iterative(7)), Some(7));
/// assert!(encode_iterative(0).is_empty());
/// ```
pub fn encode_iterative(input: u64) -> Vec<SignedDigit> {
    // u64::MAX rounds up to 2^64 during the walk
    let mut state = u128::from(input);
    let mut digits = Vec::with_capacity(u64::BITS as usize + 1);
    while state > 0 {
        if state & 1 == 1 {
            // Picking 2 - (x mod 4) leaves a multiple of 4, so the next digit is a zero
            if state & 0b11 == 1 {
                digits.push(1);
                state -= 1;
            } else {
                digits.push(-1);
                state += 1;
            }
        } else {
            digits.push(0);
        }
        state >>= 1;
    }
    digits.reverse();
    digits
}

/// Recompose the value of a signed digit sequence, most significant digit first.
///
/// This is the inverse of [`encode_iterative`]. It accepts any sequence of digits in
/// $\\{-1, 0, 1\\}$, adjacent or not, so the result may be negative. Leading zeros are
/// ignored whatever their number.
///
/// Returns `None` if a digit is out of range or if the value does not fit in an `i128`.
///
/// # Example
///
/// ```rust
/// use rotation_basis::sdr::decode;
/// assert_eq!(decode(&[1, 0, -1]), Some(3));
/// assert_eq!(decode(&[-1, 0, 1]), Some(-3));
/// assert_eq!(decode(&[]), Some(0));
/// assert_eq!(decode(&[2]), None);
/// ```
pub fn decode(digits: &[SignedDigit]) -> Option<i128> {
    let mut value = 0i128;
    for (position, &digit) in digits.iter().rev().enumerate() {
        if digit == 0 {
            continue;
        }
        let place_value = u32::try_from(position)
            .ok()
            .and_then(|shift| 1u128.checked_shl(shift))?;
        value = match digit {
            1 => value.checked_add_unsigned(place_value)?,
            -1 => value.checked_sub_unsigned(place_value)?,
            _ => return None,
        };
    }
    Some(value)
}
