//! Shared primitive types used across the analytics core.

/// A provider identifier exactly as it appears in the source dataset.
pub type ProviderId = String;

/// A CPT procedure code. Always an opaque categorical string, even
/// when every value in a file happens to look numeric.
pub type CptCode = String;

/// A zero-padded "YYYY-MM" grouping key. String order equals
/// chronological order, and callers rely on that.
pub type MonthKey = String;
