//! Recency ordering for tasks and tabs

use chrono::{DateTime, Utc};

/// Most recently active first. The sort is stable, so items with the same
/// activity keep their relative order.
pub fn sort_by_activity_descending<T, F>(mut items: Vec<T>, last_activity: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| last_activity(b).cmp(&last_activity(a)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_descending_order() {
        let items = vec![(1, at(100)), (2, at(300)), (3, at(200))];
        let sorted = sort_by_activity_descending(items, |(_, t)| *t);
        let ids: Vec<i32> = sorted.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let items = vec![(1, at(100)), (2, at(200)), (3, at(100)), (4, at(200))];
        let sorted = sort_by_activity_descending(items, |(_, t)| *t);
        let ids: Vec<i32> = sorted.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }
}
