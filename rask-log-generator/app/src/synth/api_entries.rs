use super::pools::sample;
use crate::domain::{ApiLevel, ApiLogEntry, iso_timestamp};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::Rng;

/// `count` fake entries for `/api/logs`, numbered from 1.
pub fn api_log_entries<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<ApiLogEntry> {
    (1..=count as u64)
        .map(|id| ApiLogEntry {
            id,
            timestamp: iso_timestamp(),
            message: Sentence(4..12).fake_with_rng(rng),
            level: *sample(rng, &ApiLevel::ALL[..]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_exact_count_and_ids() {
        let mut rng = StdRng::seed_from_u64(2);
        let entries = api_log_entries(&mut rng, 5);
        assert_eq!(entries.len(), 5);
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(entries.iter().all(|e| !e.message.is_empty()));
    }

    #[test]
    fn test_zero_entries() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(api_log_entries(&mut rng, 0).is_empty());
    }
}
