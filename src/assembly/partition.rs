//! Work partitioning for parallel graph construction

/// Split `n` items into `parts` contiguous ranges.
///
/// Returns `parts + 1` boundaries; range `i` is `bounds[i]..bounds[i + 1]`.
/// Range sizes differ by at most one, the larger ones come first.
/// `parts == 0` is treated as a single partition.
pub fn divide_in_partitions(n: usize, parts: usize) -> Vec<usize> {
    let parts = parts.max(1);
    let base = n / parts;
    let remainder = n % parts;

    (0..=parts)
        .map(|i| i * base + i.min(remainder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(divide_in_partitions(12, 4), vec![0, 3, 6, 9, 12]);
    }

    #[test]
    fn test_uneven_split() {
        let bounds = divide_in_partitions(31, 4);
        assert_eq!(bounds, vec![0, 8, 16, 24, 31]);
    }

    #[test]
    fn test_more_parts_than_items() {
        let bounds = divide_in_partitions(2, 5);
        assert_eq!(bounds, vec![0, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_zero_parts() {
        assert_eq!(divide_in_partitions(7, 0), vec![0, 7]);
        assert_eq!(divide_in_partitions(0, 3), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_sizes_differ_by_at_most_one() {
        for n in 0..50 {
            for parts in 1..9 {
                let bounds = divide_in_partitions(n, parts);
                assert_eq!(bounds.len(), parts + 1);
                assert_eq!(bounds[0], 0);
                assert_eq!(bounds[parts], n);
                let sizes: Vec<_> = bounds.windows(2).map(|w| w[1] - w[0]).collect();
                let max = *sizes.iter().max().unwrap();
                let min = *sizes.iter().min().unwrap();
                assert!(max - min <= 1, "n={} parts={} sizes={:?}", n, parts, sizes);
            }
        }
    }
}
