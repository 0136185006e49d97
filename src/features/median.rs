//! Median of five
//!
//! Fixed six-comparison selection network, no sorting and no allocation.

/// Return the median (third smallest) of five values
///
/// The result depends only on the multiset of inputs, never on their order.
#[inline]
pub fn median_of_five<T: Ord + Copy>(a: T, b: T, c: T, d: T, e: T) -> T {
    let (a, b) = if b < a { (b, a) } else { (a, b) };
    let (c, d) = if d < c { (d, c) } else { (c, d) };

    // `a` (or `c`) is now the smallest of a..d and cannot be the median.
    let (b, c, d) = if c < a { (d, a, b) } else { (b, c, d) };

    // Median of five is now the second smallest of {b, c, d, e}, with c <= d.
    let (b, e) = if e < b { (e, b) } else { (b, e) };
    let (c, e) = if c < b { (b, d) } else { (c, e) };

    // Smallest of the four is gone; the median is the smaller of c and e.
    if c < e {
        c
    } else {
        e
    }
}
