use crate::error::GeneratorError;
use std::fmt;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const BYTES_PER_GB: u64 = 1024 * BYTES_PER_MB;

/// Stop condition of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTarget {
    /// Stop once the cumulative serialized size reaches this many bytes.
    Bytes(u64),
    /// Stop once this many records have been sent.
    Count(u64),
}

impl GenerationTarget {
    pub fn megabytes(size_mb: f64) -> Result<Self, GeneratorError> {
        Self::from_scaled(size_mb, BYTES_PER_MB, "size_mb")
    }

    pub fn gigabytes(size_gb: f64) -> Result<Self, GeneratorError> {
        Self::from_scaled(size_gb, BYTES_PER_GB, "size")
    }

    pub fn count(records: u64) -> Self {
        GenerationTarget::Count(records)
    }

    fn from_scaled(quantity: f64, unit: u64, name: &str) -> Result<Self, GeneratorError> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(GeneratorError::InvalidTarget(format!(
                "{name} must be a non-negative number, got {quantity}"
            )));
        }
        let bytes = (quantity * unit as f64).ceil();
        if bytes > u64::MAX as f64 {
            return Err(GeneratorError::InvalidTarget(format!(
                "{name} is too large: {quantity}"
            )));
        }
        Ok(GenerationTarget::Bytes(bytes as u64))
    }

    /// True once the totals meet or exceed the threshold.
    pub fn is_reached(&self, records: u64, bytes: u64) -> bool {
        match *self {
            GenerationTarget::Bytes(limit) => bytes >= limit,
            GenerationTarget::Count(limit) => records >= limit,
        }
    }

    /// Byte-mode runs inflate records with filler until half the target is written.
    pub fn wants_filler(&self, bytes: u64) -> bool {
        match *self {
            GenerationTarget::Bytes(limit) => bytes.saturating_mul(2) < limit,
            GenerationTarget::Count(_) => false,
        }
    }

    pub fn progress_percent(&self, records: u64, bytes: u64) -> f64 {
        let (done, limit) = match *self {
            GenerationTarget::Bytes(limit) => (bytes, limit),
            GenerationTarget::Count(limit) => (records, limit),
        };
        if limit == 0 {
            100.0
        } else {
            done as f64 / limit as f64 * 100.0
        }
    }

    /// Query-string form used in the `parameters` field of lifecycle records.
    pub fn as_parameters(&self) -> String {
        match *self {
            GenerationTarget::Bytes(limit) => {
                format!("size_mb={}", limit as f64 / BYTES_PER_MB as f64)
            }
            GenerationTarget::Count(limit) => format!("count={limit}"),
        }
    }
}

impl fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GenerationTarget::Bytes(limit) => {
                write!(f, "{:.2}MB", limit as f64 / BYTES_PER_MB as f64)
            }
            GenerationTarget::Count(limit) => write!(f, "{limit} records"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabytes_to_bytes() {
        assert_eq!(
            GenerationTarget::megabytes(10.0).unwrap(),
            GenerationTarget::Bytes(10 * BYTES_PER_MB)
        );
        assert_eq!(
            GenerationTarget::megabytes(0.5).unwrap(),
            GenerationTarget::Bytes(BYTES_PER_MB / 2)
        );
    }

    #[test]
    fn test_gigabytes_to_bytes() {
        assert_eq!(
            GenerationTarget::gigabytes(2.0).unwrap(),
            GenerationTarget::Bytes(2 * BYTES_PER_GB)
        );
    }

    #[test]
    fn test_negative_and_nan_sizes_rejected() {
        assert!(GenerationTarget::megabytes(-1.0).is_err());
        assert!(GenerationTarget::megabytes(f64::NAN).is_err());
        assert!(GenerationTarget::gigabytes(f64::INFINITY).is_err());
    }

    #[test]
    fn test_is_reached() {
        let bytes = GenerationTarget::Bytes(100);
        assert!(!bytes.is_reached(50, 99));
        assert!(bytes.is_reached(1, 100));
        assert!(bytes.is_reached(1, 150));

        let count = GenerationTarget::Count(3);
        assert!(!count.is_reached(2, 10_000));
        assert!(count.is_reached(3, 0));
    }

    #[test]
    fn test_zero_target_is_reached_immediately() {
        assert!(GenerationTarget::Bytes(0).is_reached(0, 0));
        assert!(GenerationTarget::Count(0).is_reached(0, 0));
        assert!(GenerationTarget::megabytes(0.0).unwrap().is_reached(0, 0));
    }

    #[test]
    fn test_wants_filler_until_halfway() {
        let target = GenerationTarget::Bytes(1000);
        assert!(target.wants_filler(0));
        assert!(target.wants_filler(499));
        assert!(!target.wants_filler(500));
        assert!(!GenerationTarget::Count(1000).wants_filler(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(GenerationTarget::Bytes(BYTES_PER_MB).to_string(), "1.00MB");
        assert_eq!(GenerationTarget::Count(5).to_string(), "5 records");
        assert_eq!(GenerationTarget::Count(5).as_parameters(), "count=5");
    }
}
