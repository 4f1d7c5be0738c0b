//! Part sizing for multipart transfers.
//!
//! This module contains pure logic for partitioning an object into parts.
//! No I/O operations - just decision making.

/// One contiguous byte range of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartInfo {
    /// 1-based part number.
    pub part_number: u32,
    /// Byte offset within the object.
    pub offset: u64,
    /// Length of this part in bytes.
    pub size: u64,
    /// Whether this is the final part of the object.
    pub is_last: bool,
}

impl PartInfo {
    /// Inclusive offset of the last byte in this part.
    pub fn end_inclusive(&self) -> u64 {
        self.offset + self.size - 1
    }

    /// HTTP `Range` header value for this part.
    pub fn range_header(&self) -> String {
        range_header_value(self.offset, self.end_inclusive())
    }
}

/// Render an inclusive byte range as a `Range` header value.
///
/// # Arguments
/// * `start` - First byte offset (inclusive)
/// * `end_inclusive` - Last byte offset (inclusive)
pub fn range_header_value(start: u64, end_inclusive: u64) -> String {
    format!("bytes={}-{}", start, end_inclusive)
}

/// Number of parts an object of `object_size` bytes is split into.
///
/// `floor(object_size / min_part_size)` capped at `max_part_count`, and
/// never less than one so an object between the threshold and the minimum
/// part size still forms a single part.
pub fn part_count(object_size: u64, min_part_size: u64, max_part_count: u32) -> u32 {
    let raw: u64 = object_size / min_part_size.max(1);
    raw.min(u64::from(max_part_count)).max(1) as u32
}

/// Partition an object into ordered parts.
///
/// Part size is `ceil(object_size / part_count)`. Each part takes
/// `min(part_size, remaining)` bytes, so the final part absorbs the rounding
/// remainder and the part sizes always sum to `object_size`. When rounding
/// would leave trailing parts empty the count shrinks to
/// `ceil(object_size / part_size)`.
///
/// # Arguments
/// * `object_size` - Total object size in bytes
/// * `min_part_size` - Lower bound for each part's size
/// * `max_part_count` - Upper bound for the number of parts
///
/// # Returns
/// Parts in ascending offset order; exactly the last one has `is_last` set.
/// Empty for a zero-length object.
pub fn compute_parts(object_size: u64, min_part_size: u64, max_part_count: u32) -> Vec<PartInfo> {
    if object_size == 0 {
        return Vec::new();
    }

    let count: u64 = u64::from(part_count(object_size, min_part_size, max_part_count));
    let part_size: u64 = object_size.div_ceil(count);
    let count: u64 = object_size.div_ceil(part_size);

    let mut parts: Vec<PartInfo> = Vec::with_capacity(count as usize);
    let mut offset: u64 = 0;

    for index in 0..count {
        let size: u64 = std::cmp::min(part_size, object_size - offset);
        parts.push(PartInfo {
            part_number: (index + 1) as u32,
            offset,
            size,
            is_last: index + 1 == count,
        });
        offset += size;
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIB;

    fn assert_well_formed(parts: &[PartInfo], object_size: u64) {
        let total: u64 = parts.iter().map(|p| p.size).sum();
        assert_eq!(total, object_size);

        let mut expected_offset: u64 = 0;
        for (index, part) in parts.iter().enumerate() {
            assert_eq!(part.part_number as usize, index + 1);
            assert_eq!(part.offset, expected_offset);
            assert!(part.size > 0);
            assert_eq!(part.is_last, index + 1 == parts.len());
            expected_offset += part.size;
        }
    }

    #[test]
    fn test_two_even_parts() {
        let parts = compute_parts(10, 5, 10);
        assert_eq!(
            parts,
            vec![
                PartInfo {
                    part_number: 1,
                    offset: 0,
                    size: 5,
                    is_last: false,
                },
                PartInfo {
                    part_number: 2,
                    offset: 5,
                    size: 5,
                    is_last: true,
                },
            ]
        );
        assert_eq!(parts[0].range_header(), "bytes=0-4");
        assert_eq!(parts[1].range_header(), "bytes=5-9");
    }

    #[test]
    fn test_floor_to_single_part() {
        let parts = compute_parts(131_082, 131_072, 10_000);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].offset, 0);
        assert_eq!(parts[0].size, 131_082);
        assert!(parts[0].is_last);
        assert_eq!(parts[0].range_header(), "bytes=0-131081");
    }

    #[test]
    fn test_uneven_split_first_part_larger() {
        let parts = compute_parts(16 * MIB + 1, 8 * MIB, 2);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].size, 8 * MIB + 1);
        assert_eq!(parts[0].range_header(), format!("bytes=0-{}", 8 * MIB));
        assert_eq!(parts[1].offset, 8 * MIB + 1);
        assert_eq!(parts[1].size, 8 * MIB);
        assert_eq!(parts[1].range_header(), format!("bytes={}-{}", 8 * MIB + 1, 16 * MIB));
    }

    #[test]
    fn test_high_max_part_count_retains_min_part_size() {
        let parts = compute_parts(16 * MIB, 8 * MIB, 32);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.size == 8 * MIB));
    }

    #[test]
    fn test_max_part_count_caps_parts() {
        let parts = compute_parts(24 * MIB, MIB, 3);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.size == 8 * MIB));
    }

    #[test]
    fn test_last_part_absorbs_remainder() {
        let parts = compute_parts(10, 3, 10);
        assert_eq!(parts.iter().map(|p| p.size).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_well_formed(&parts, 10);
    }

    #[test]
    fn test_rounding_never_produces_empty_parts() {
        // ceil(10 / 6) = 2 would leave a sixth part with zero bytes
        let parts = compute_parts(10, 1, 6);
        assert_eq!(parts.len(), 5);
        assert_well_formed(&parts, 10);
    }

    #[test]
    fn test_object_smaller_than_min_part_is_one_part() {
        let parts = compute_parts(3, 5, 10);
        assert_eq!(parts.len(), 1);
        assert_well_formed(&parts, 3);
    }

    #[test]
    fn test_well_formed_across_inputs() {
        for object_size in [1u64, 2, 7, 99, 100, 101, 1_000, 4_097, 65_537] {
            for min_part_size in [1u64, 2, 3, 10, 64, 1_000] {
                for max_part_count in [1u32, 2, 3, 7, 10_000] {
                    let parts = compute_parts(object_size, min_part_size, max_part_count);
                    assert!(parts.len() as u32 <= max_part_count);
                    assert_well_formed(&parts, object_size);
                }
            }
        }
    }

    #[test]
    fn test_sizing_is_deterministic() {
        assert_eq!(
            compute_parts(16 * MIB + 7, 5 * MIB, 10_000),
            compute_parts(16 * MIB + 7, 5 * MIB, 10_000)
        );
    }

    #[test]
    fn test_zero_size_has_no_parts() {
        assert!(compute_parts(0, 5, 10).is_empty());
        assert!(compute_parts(0, 0, 0).is_empty());
    }

    #[test]
    fn test_part_count() {
        assert_eq!(part_count(16 * MIB, 5 * MIB, 10_000), 3);
        assert_eq!(part_count(10, 5, 1), 1);
        assert_eq!(part_count(4, 5, 10), 1);
    }
}
