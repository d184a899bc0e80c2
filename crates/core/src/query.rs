//! Filter-and-sort queries over the surgery collection.

use crate::surgery::Surgery;
use chrono::{DateTime, Utc};
use surgery_types::SurgeryStatus;

/// A filter over surgeries. Matches always come back soonest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurgeryQuery {
    /// Only surgeries at or after this instant.
    pub not_before: Option<DateTime<Utc>>,
    /// Only surgeries whose status is in this set.
    pub statuses: Option<Vec<SurgeryStatus>>,
}

impl SurgeryQuery {
    /// Every surgery, oldest first.
    pub fn all() -> Self {
        Self::default()
    }

    /// Scheduled surgeries from `now` onwards, soonest first. This is what the list endpoint serves.
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            not_before: Some(now),
            statuses: Some(vec![SurgeryStatus::Scheduled]),
        }
    }

    pub fn matches(&self, surgery: &Surgery) -> bool {
        let in_window = self
            .not_before
            .map_or(true, |not_before| surgery.date_time >= not_before);
        let in_statuses = self
            .statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&surgery.status));
        in_window && in_statuses
    }

    /// Keeps matching surgeries and sorts them. Ties on `date_time` fall back to id so the order
    /// is stable across calls.
    pub fn apply(&self, surgeries: Vec<Surgery>) -> Vec<Surgery> {
        let mut matched: Vec<Surgery> = surgeries.into_iter().filter(|s| self.matches(s)).collect();
        matched.sort_by(|a, b| a.date_time.cmp(&b.date_time).then_with(|| a.id.cmp(&b.id)));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surgery::Patient;
    use chrono::{Duration, TimeZone};
    use surgery_types::NonEmptyText;
    use surgery_uuid::ShardableUuid;

    fn surgery(date_time: DateTime<Utc>, status: SurgeryStatus) -> Surgery {
        Surgery {
            id: ShardableUuid::new(),
            date_time,
            surgery_type: NonEmptyText::new("Arthroscopy").unwrap(),
            surgeon: NonEmptyText::new("Dr. Lisa Park").unwrap(),
            patient: Patient {
                name: NonEmptyText::new("J. Doe").unwrap(),
                birthdate: None,
                age: None,
            },
            status,
            created_at: date_time,
            updated_at: date_time,
        }
    }

    #[test]
    fn upcoming_excludes_past_and_non_scheduled() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let query = SurgeryQuery::upcoming(now);

        assert!(query.matches(&surgery(now, SurgeryStatus::Scheduled)));
        assert!(query.matches(&surgery(now + Duration::days(1), SurgeryStatus::Scheduled)));
        assert!(!query.matches(&surgery(now - Duration::seconds(1), SurgeryStatus::Scheduled)));
        assert!(!query.matches(&surgery(now + Duration::days(1), SurgeryStatus::Cancelled)));
        assert!(!query.matches(&surgery(now + Duration::days(1), SurgeryStatus::Completed)));
    }

    #[test]
    fn apply_sorts_ascending_by_date_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let input = vec![
            surgery(now + Duration::days(3), SurgeryStatus::Scheduled),
            surgery(now + Duration::days(1), SurgeryStatus::Scheduled),
            surgery(now - Duration::days(1), SurgeryStatus::Scheduled),
            surgery(now + Duration::days(2), SurgeryStatus::Cancelled),
            surgery(now + Duration::days(2), SurgeryStatus::Scheduled),
        ];

        let result = SurgeryQuery::upcoming(now).apply(input);

        let times: Vec<_> = result.iter().map(|s| s.date_time).collect();
        assert_eq!(
            times,
            vec![
                now + Duration::days(1),
                now + Duration::days(2),
                now + Duration::days(3)
            ]
        );
    }

    #[test]
    fn all_matches_everything_in_ascending_order() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let input = vec![
            surgery(now + Duration::days(1), SurgeryStatus::Completed),
            surgery(now - Duration::days(1), SurgeryStatus::Cancelled),
        ];

        let result = SurgeryQuery::all().apply(input);
        assert_eq!(result.len(), 2);
        assert!(result[0].date_time < result[1].date_time);
    }
}
