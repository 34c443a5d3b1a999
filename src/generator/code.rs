//! Codes of prescribed shape.
//!
//! A code shape is `(L, M, N)`: `N` distinct codewords, the longest exactly
//! `M` bits, `L` bits in total. There are `2^l` codewords of length `l`, so
//! the shape is feasible iff `N <= 2^(M+1) - 2` and `L` lies between
//! [`min_code_length`] and [`max_code_length`].

use rand::Rng;
use rand::seq::index;

use crate::error::{BicodeError, Result};

/// Longest codeword length the generators accept.
pub const MAX_GENERATED_LENGTH: usize = 30;

/// Number of distinct non-empty bit strings of length at most `max_length`.
pub fn max_number_codewords(max_length: usize) -> usize {
    (2usize << max_length) - 2
}

fn check_shape(max_length: usize, count: usize) -> Result<()> {
    if max_length == 0 || max_length > MAX_GENERATED_LENGTH {
        return Err(BicodeError::invalid_argument(format!(
            "max length must be in 1..={MAX_GENERATED_LENGTH}, got {max_length}"
        )));
    }
    if count == 0 || count > max_number_codewords(max_length) {
        return Err(BicodeError::invalid_argument(format!(
            "cannot pick {count} distinct codewords of length at most {max_length}"
        )));
    }
    Ok(())
}

/// Codewords per length, index `l - 1`, filling lengths in `order` after the
/// mandatory codeword of length `max_length`.
fn fill<I: Iterator<Item = usize>>(max_length: usize, count: usize, order: I) -> Vec<usize> {
    let mut counts = vec![0; max_length];
    counts[max_length - 1] = 1;
    let mut left = count - 1;
    for length in order {
        let room = (1usize << length) - counts[length - 1];
        let taken = room.min(left);
        counts[length - 1] += taken;
        left -= taken;
        if left == 0 {
            break;
        }
    }
    counts
}

fn total_length(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .map(|(i, n)| (i + 1) * n)
        .sum()
}

/// Least total length of a code of `count` codewords with maximum length
/// `max_length`.
pub fn min_code_length(max_length: usize, count: usize) -> Result<usize> {
    check_shape(max_length, count)?;
    Ok(total_length(&fill(max_length, count, 1..=max_length)))
}

/// Greatest total length of a code of `count` codewords with maximum length
/// `max_length`.
pub fn max_code_length(max_length: usize, count: usize) -> Result<usize> {
    check_shape(max_length, count)?;
    Ok(total_length(&fill(max_length, count, (1..=max_length).rev())))
}

/// Random code of `count` distinct codewords, maximum length `max_length`
/// and total length `total`.
///
/// Starts from the shortest distribution of lengths and lengthens random
/// codewords one bit at a time until the total is reached; the bit patterns
/// of each length are then drawn without replacement. Codewords come out
/// grouped by length, shortest first.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use bicode::generator::generate_code;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let code = generate_code(12, 4, 5, &mut rng).unwrap();
/// assert_eq!(code.len(), 5);
/// assert_eq!(code.iter().map(String::len).sum::<usize>(), 12);
/// assert_eq!(code.iter().map(String::len).max(), Some(4));
/// ```
pub fn generate_code<R: Rng + ?Sized>(
    total: usize,
    max_length: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let min = min_code_length(max_length, count)?;
    let max = max_code_length(max_length, count)?;
    if total < min || total > max {
        return Err(BicodeError::invalid_argument(format!(
            "total length {total} is outside {min}..={max} for {count} codewords of length at most {max_length}"
        )));
    }

    let mut counts = fill(max_length, count, 1..=max_length);
    let mut current = min;
    while current < total {
        let movable: Vec<usize> = (1..max_length)
            .filter(|&l| counts[l - 1] > 0 && counts[l] < (1usize << (l + 1)))
            .collect();
        // Below the maximum some codeword can always grow by one bit.
        let length = movable[rng.random_range(0..movable.len())];
        counts[length - 1] -= 1;
        counts[length] += 1;
        current += 1;
    }

    let mut code = Vec::with_capacity(count);
    for (i, &n) in counts.iter().enumerate() {
        let length = i + 1;
        for value in index::sample(rng, 1usize << length, n) {
            code.push(format!("{value:0length$b}"));
        }
    }
    Ok(code)
}

/// Random prefix-free code of `count` codewords no longer than `max_length`.
///
/// Grows a complete binary tree by splitting random leaves, so the result
/// also meets Kraft's inequality with equality when `count > 1`.
pub fn generate_prefix_code<R: Rng + ?Sized>(
    max_length: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if max_length == 0
        || max_length > MAX_GENERATED_LENGTH
        || count == 0
        || count > 1usize << max_length
    {
        return Err(BicodeError::invalid_argument(format!(
            "cannot build a prefix code of {count} codewords of length at most {max_length}"
        )));
    }
    if count == 1 {
        let bit = if rng.random_bool(0.5) { "1" } else { "0" };
        return Ok(vec![bit.to_string()]);
    }

    let mut leaves = vec!["0".to_string(), "1".to_string()];
    while leaves.len() < count {
        let splittable: Vec<usize> = (0..leaves.len())
            .filter(|&i| leaves[i].len() < max_length)
            .collect();
        let leaf = leaves.swap_remove(splittable[rng.random_range(0..splittable.len())]);
        leaves.push(format!("{leaf}0"));
        leaves.push(format!("{leaf}1"));
    }
    leaves.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Alphabet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_shape_bounds() {
        assert_eq!(max_number_codewords(1), 2);
        assert_eq!(max_number_codewords(3), 14);

        // One codeword: it has to be the long one.
        assert_eq!(min_code_length(3, 1).unwrap(), 3);
        assert_eq!(max_code_length(3, 1).unwrap(), 3);
        // "0", "1" + one of length 3.
        assert_eq!(min_code_length(3, 3).unwrap(), 5);
        // Three of length 3.
        assert_eq!(max_code_length(3, 3).unwrap(), 9);
        // Everything.
        assert_eq!(min_code_length(2, 6).unwrap(), 10);
        assert_eq!(max_code_length(2, 6).unwrap(), 10);

        assert!(min_code_length(2, 7).is_err());
        assert!(min_code_length(0, 1).is_err());
        assert!(max_code_length(3, 0).is_err());
    }

    #[test]
    fn test_generate_code_shapes() {
        let mut rng = StdRng::seed_from_u64(42);
        for max_length in 1..=4 {
            for count in 1..=max_number_codewords(max_length) {
                let min = min_code_length(max_length, count).unwrap();
                let max = max_code_length(max_length, count).unwrap();
                for total in min..=max {
                    let code = generate_code(total, max_length, count, &mut rng).unwrap();
                    assert_eq!(code.len(), count);
                    assert_eq!(code.iter().map(String::len).sum::<usize>(), total);
                    assert_eq!(code.iter().map(String::len).max(), Some(max_length));

                    let mut unique = code.clone();
                    unique.sort();
                    unique.dedup();
                    assert_eq!(unique.len(), count, "{code:?}");
                    assert!(Alphabet::new(&code).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_generate_code_rejects_infeasible_total() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_code(4, 3, 3, &mut rng).is_err());
        assert!(generate_code(10, 3, 3, &mut rng).is_err());
    }

    #[test]
    fn test_generate_code_is_reproducible() {
        let first = generate_code(20, 5, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = generate_code(20, 5, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_prefix_codes() {
        let mut rng = StdRng::seed_from_u64(3);
        for max_length in 1..=5 {
            for count in 1..=(1usize << max_length) {
                let code = generate_prefix_code(max_length, count, &mut rng).unwrap();
                assert_eq!(code.len(), count);
                assert!(code.iter().all(|c| c.len() <= max_length));
                assert!(Alphabet::new(&code).unwrap().is_prefix_free(), "{code:?}");
            }
        }
        assert!(generate_prefix_code(2, 5, &mut rng).is_err());
    }
}
