//! Short, human friendly identifiers for games and teams.
//!
//! An identifier is the two digit year, the two digit month and three random
//! digits, e.g. `2410417`. That only leaves 900 identifiers per month, so every
//! insert that uses one retries with a fresh identifier on a primary key collision.

use chrono::{DateTime, Datelike, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use rand::Rng;

use crate::db;
use crate::errors::ServiceError;

const MAX_ATTEMPTS: usize = 5;

pub fn generate() -> String {
    generate_at(Utc::now(), &mut rand::thread_rng())
}

fn generate_at<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    format!(
        "{:02}{:02}{:03}",
        now.year() % 100,
        now.month(),
        rng.gen_range(100, 1000)
    )
}

/// Runs `insert` with freshly generated identifiers until one doesn't collide.
///
/// Every attempt runs in its own (nested) transaction, so a failed attempt
/// doesn't abort a surrounding transaction.
pub fn insert_with_fresh_id<T, F>(conn: &db::Conn, mut insert: F) -> Result<T, ServiceError>
where
    F: FnMut(&str) -> Result<T, DBError>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let id = generate();

        match conn.transaction(|| insert(&id)) {
            Err(DBError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!("identifier {} is taken (attempt {})", id, attempt);
            }
            result => return result.map_err(ServiceError::from),
        }
    }

    error!("unable to find a free identifier in {} attempts", MAX_ATTEMPTS);
    Err(ServiceError::internal())
}

/// Checks if `id` looks like something `generate` would produce
#[cfg(test)]
pub fn is_well_formed(id: &str) -> bool {
    id.len() == 7 && id.chars().all(|c| c.is_ascii_digit()) && &id[4..5] != "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn year_month_prefix() {
        let now = Utc.ymd(2024, 3, 15).and_hms(12, 0, 0);
        let id = generate_at(now, &mut rand::thread_rng());

        assert!(id.starts_with("2403"), "unexpected id {}", id);
        assert!(is_well_formed(&id));
    }

    #[test]
    fn random_suffix_is_three_digits() {
        let now = Utc.ymd(2030, 12, 1).and_hms(0, 0, 0);
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let id = generate_at(now, &mut rng);
            let suffix: u32 = id[4..].parse().unwrap();

            assert!(id.starts_with("3012"));
            assert!((100..1000).contains(&suffix), "suffix out of range: {}", id);
        }
    }

    #[test]
    fn generated_ids_are_well_formed() {
        assert!(is_well_formed(&generate()));
        assert!(!is_well_formed("24101"));
        assert!(!is_well_formed("2410a23"));
    }
}
