use std::sync::Arc;
use std::time::{Duration, Instant};

use foundation::math::precision::stable_total_cmp_f64;
use globe::{Person, Tier};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One row of the neighborhood list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub airport: Option<String>,
    pub logged_hours: f64,
    pub approved: bool,
    pub tier: Tier,
}

impl From<&Person> for RosterEntry {
    fn from(p: &Person) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            airport: p.airport_code(),
            logged_hours: p.logged_hours,
            approved: p.approved,
            tier: p.tier(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most hours first.
    #[default]
    Hours,
    /// Alphabetical, case-insensitive.
    Name,
    /// Tier order, then most hours.
    Approved,
}

/// Sorted roster; ties always fall back to name then id so the order is stable
/// across fetches.
pub fn sorted_roster(people: &[Person], key: SortKey) -> Vec<RosterEntry> {
    let mut entries: Vec<RosterEntry> = people.iter().map(RosterEntry::from).collect();
    entries.sort_by(|a, b| {
        let by_name = || {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        };
        match key {
            SortKey::Hours => {
                stable_total_cmp_f64(b.logged_hours, a.logged_hours).then_with(by_name)
            }
            SortKey::Name => by_name(),
            SortKey::Approved => a
                .tier
                .cmp(&b.tier)
                .then_with(|| stable_total_cmp_f64(b.logged_hours, a.logged_hours))
                .then_with(by_name),
        }
    });
    entries
}

/// Last fetched person list, reused until it is older than the TTL.
pub struct RosterCache {
    ttl: Duration,
    slot: Mutex<Option<(Instant, Arc<[Person]>)>>,
}

impl RosterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn get(&self, now: Instant) -> Option<Arc<[Person]>> {
        let slot = self.slot.lock();
        let (fetched_at, people) = slot.as_ref()?;
        (now.saturating_duration_since(*fetched_at) < self.ttl).then(|| Arc::clone(people))
    }

    pub fn put(&self, now: Instant, people: Vec<Person>) -> Arc<[Person]> {
        let people: Arc<[Person]> = people.into();
        *self.slot.lock() = Some((now, Arc::clone(&people)));
        people
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use globe::Person;
    use pretty_assertions::assert_eq;

    use super::{sorted_roster, RosterCache, SortKey};

    fn people() -> Vec<Person> {
        vec![
            Person::new("1", "carol").with_hours(40.0),
            Person::new("2", "Alice").with_hours(150.0),
            Person::new("3", "bob").with_hours(40.0).approved(),
            Person::new("4", "Dave"),
        ]
    }

    fn ids(entries: &[super::RosterEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn hours_sort_is_descending_with_name_ties() {
        let entries = sorted_roster(&people(), SortKey::Hours);
        assert_eq!(ids(&entries), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let entries = sorted_roster(&people(), SortKey::Name);
        assert_eq!(ids(&entries), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn approved_sort_groups_by_tier() {
        let entries = sorted_roster(&people(), SortKey::Approved);
        assert_eq!(ids(&entries), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn sort_key_parses_from_query_values() {
        let key: SortKey = serde_json::from_str(r#""name""#).unwrap();
        assert_eq!(key, SortKey::Name);
        assert_eq!(SortKey::default(), SortKey::Hours);
    }

    #[test]
    fn cache_expires_after_ttl() {
        let cache = RosterCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(cache.get(t0).is_none());

        cache.put(t0, people());
        assert_eq!(cache.get(t0 + Duration::from_secs(9)).unwrap().len(), 4);
        assert!(cache.get(t0 + Duration::from_secs(10)).is_none());
    }
}
