use core::ops::Range;

/// Split `total` bytes into `parts` contiguous ranges of `total / parts`
/// bytes each, with the final range absorbing the remainder of the integer
/// division. The range lengths always sum to `total` exactly.
pub fn chunk_ranges(total: usize, parts: usize) -> Vec<Range<usize>> {
    assert!(parts >= 1, "cannot partition into zero chunks");

    let chunk = total / parts;
    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i == parts - 1 { total } else { start + chunk };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::chunk_ranges;

    fn assert_covers(total: usize, parts: usize) {
        let ranges = chunk_ranges(total, parts);
        assert_eq!(ranges.len(), parts);
        assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), total);

        // contiguity
        let mut expected_start = 0;
        for range in &ranges {
            assert_eq!(range.start, expected_start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, total);
    }

    #[test]
    fn exact_division() {
        assert_eq!(chunk_ranges(12, 3), [0..4, 4..8, 8..12]);
    }

    #[test]
    fn last_chunk_absorbs_remainder() {
        assert_eq!(chunk_ranges(10, 3), [0..3, 3..6, 6..10]);
        assert_eq!(chunk_ranges(7, 4), [0..1, 1..2, 2..3, 3..7]);
    }

    #[test]
    fn single_part() {
        assert_eq!(chunk_ranges(100, 1), [0..100]);
    }

    #[test]
    fn more_parts_than_bytes() {
        // chunk size rounds to zero; everything lands in the last range
        assert_eq!(chunk_ranges(2, 4), [0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn zero_total() {
        assert_covers(0, 3);
    }

    #[test]
    fn sums_hold_across_parameter_grid() {
        for total in [1, 5, 64, 4096, 4097, 1 << 20] {
            for parts in [1, 2, 3, 7, 16, 64] {
                assert_covers(total, parts);
            }
        }
    }
}
