use std::fmt;

use serde::{Deserialize, Serialize};

/// Logged hours at which an unapproved person counts as a veteran.
pub const VETERAN_HOURS: f64 = 100.0;

/// Opaque identifier assigned by the external data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Standing of a person in the neighborhood, highest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Approved,
    Veteran,
    Newcomer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub airport: Option<String>,
    pub logged_hours: f64,
    pub approved: bool,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
            airport: None,
            logged_hours: 0.0,
            approved: false,
        }
    }

    pub fn with_airport(mut self, code: impl Into<String>) -> Self {
        self.airport = Some(code.into());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.logged_hours = hours;
        self
    }

    pub fn approved(mut self) -> Self {
        self.approved = true;
        self
    }

    /// Airport code trimmed and uppercased; `None` when missing or blank.
    pub fn airport_code(&self) -> Option<String> {
        normalize_code(self.airport.as_deref()?)
    }

    /// NaN hours never reach the veteran threshold.
    pub fn tier(&self) -> Tier {
        if self.approved {
            Tier::Approved
        } else if self.logged_hours >= VETERAN_HOURS {
            Tier::Veteran
        } else {
            Tier::Newcomer
        }
    }
}

pub(crate) fn normalize_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_uppercase())
    }
}

/// A person as delivered by the tabular store.
///
/// Only `id` is required; everything else may be absent on a fresh row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub logged_hours_combined: Option<f64>,
    #[serde(default)]
    pub logged_hours_approved: Option<f64>,
    #[serde(default)]
    pub logged_hours_raw: Option<f64>,
    #[serde(default)]
    pub checked_hours: Option<f64>,
    #[serde(default)]
    pub airport: Option<String>,
}

impl PersonRecord {
    pub fn into_person(self) -> Person {
        let logged_hours = self
            .logged_hours_combined
            .or(self.logged_hours_raw)
            .filter(|h| h.is_finite())
            .unwrap_or(0.0)
            .max(0.0);
        let approved = self.logged_hours_approved.is_some_and(|h| h > 0.0);
        let name = self
            .full_name
            .filter(|n| !n.trim().is_empty())
            .or(self.github_username)
            .unwrap_or_else(|| self.id.clone());

        Person {
            id: PersonId(self.id),
            name,
            airport: self.airport,
            logged_hours,
            approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonRecord, Tier};

    #[test]
    fn airport_code_is_trimmed_and_uppercased() {
        let person = Person::new("a", "A").with_airport(" sfo ");
        assert_eq!(person.airport_code().as_deref(), Some("SFO"));
        assert_eq!(Person::new("a", "A").with_airport("   ").airport_code(), None);
        assert_eq!(Person::new("a", "A").airport_code(), None);
    }

    #[test]
    fn tier_prefers_approval_over_hours() {
        assert_eq!(Person::new("a", "A").approved().with_hours(5.0).tier(), Tier::Approved);
        assert_eq!(Person::new("b", "B").with_hours(100.0).tier(), Tier::Veteran);
        assert_eq!(Person::new("c", "C").with_hours(99.9).tier(), Tier::Newcomer);
        assert_eq!(Person::new("d", "D").with_hours(f64::NAN).tier(), Tier::Newcomer);
    }

    #[test]
    fn record_converts_with_fallbacks() {
        let record: PersonRecord = serde_json::from_str(
            r#"{
                "id": "rec1",
                "fullName": "Ada Lovelace",
                "githubUsername": "ada",
                "loggedHoursCombined": 120.5,
                "loggedHoursApproved": 0,
                "airport": "lhr"
            }"#,
        )
        .unwrap();
        let person = record.into_person();
        assert_eq!(person.id.as_str(), "rec1");
        assert_eq!(person.name, "Ada Lovelace");
        assert_eq!(person.logged_hours, 120.5);
        assert!(!person.approved);
        assert_eq!(person.airport_code().as_deref(), Some("LHR"));
    }

    #[test]
    fn sparse_record_falls_back_to_username_and_raw_hours() {
        let record: PersonRecord = serde_json::from_str(
            r#"{
                "id": "rec2",
                "githubUsername": "grace",
                "loggedHoursRaw": 7,
                "loggedHoursApproved": 2
            }"#,
        )
        .unwrap();
        let person = record.into_person();
        assert_eq!(person.name, "grace");
        assert_eq!(person.logged_hours, 7.0);
        assert!(person.approved);
        assert_eq!(person.airport, None);
    }

    #[test]
    fn negative_hours_clamp_to_zero() {
        let record = PersonRecord {
            id: "rec3".into(),
            logged_hours_combined: Some(-4.0),
            ..PersonRecord::default()
        };
        let person = record.into_person();
        assert_eq!(person.logged_hours, 0.0);
        assert_eq!(person.name, "rec3");
    }
}
