//! Shared constants for transfer sizing.

/// One kibibyte.
pub const KIB: u64 = 1024;

/// One mebibyte.
pub const MIB: u64 = 1024 * KIB;

/// One gibibyte.
pub const GIB: u64 = 1024 * MIB;

/// Default object size at or above which multipart transfer is used (16MB).
pub const DEFAULT_MULTIPART_THRESHOLD: u64 = 16 * MIB;

/// Default minimum size of a single part (5MB, the S3 lower bound for
/// every part but the last).
pub const DEFAULT_MIN_PART_SIZE: u64 = 5 * MIB;

/// Default upper bound on the number of parts (the S3 limit).
pub const DEFAULT_MAX_PART_COUNT: u32 = 10_000;

/// Largest buffer reserved up front when a body is read into memory.
pub const MAX_BODY_PREALLOCATION: u64 = 8 * MIB;
