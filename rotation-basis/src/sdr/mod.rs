//! Signed digit representations of unsigned integers.
//!
//! Rotating an encrypted vector by an arbitrary amount is usually done by composing rotations by
//! a fixed set of offsets, each of which requires its own key material. Writing the amount in a
//! signed binary form gives such a composition using only powers of two.
//!
//! # Description
//!
//! The non-adjacent form (NAF) of an integer $x$ is the unique decomposition
//! $$
//!     x = \sum\_{k=0}^{l-1} d\_k 2^k
//! $$
//! with $d\_k \in \\{-1, 0, 1\\}$ and $d\_k d\_{k+1} = 0$ for every $k$. Among all signed binary
//! representations of $x$ it has the fewest nonzero digits, so it minimizes the number of
//! power-of-two rotations needed to reach $x$.
//!
//! Two encoders are provided:
//!
//! * [`encode_iterative`] walks the integer one bit at a time and returns the digits as a
//!   sequence, most significant first.
//! * [`encode_bitwise`] computes the same digits with a constant number of word operations and
//!   returns them as a pair of bit masks ([`NafMasks`]).
//!
//! Both are inverted by [`decode`] and [`decode_masks`] respectively.
pub use masks::*;
pub use naf::*;

mod masks;
mod naf;

/// A digit of a signed binary representation, always one of `-1`, `0` or `1`.
pub type SignedDigit = i8;
