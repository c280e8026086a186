//! Offline counterpart of the globe endpoint: reads people and airports from
//! JSON files and prints the same layout the server would serve.

use std::fs;
use std::path::Path;

use globe::animation::animate;
use globe::{AirportTable, MarkerLayout, Person, PersonRecord, build_markers, group_by_airport};
use serde::Serialize;

/// Read a JSON array of person records.
pub fn load_people(path: &Path) -> Result<Vec<Person>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let records: Vec<PersonRecord> =
        serde_json::from_str(&text).map_err(|e| format!("parse {path:?}: {e}"))?;
    Ok(records.into_iter().map(PersonRecord::into_person).collect())
}

pub fn load_airports(path: &Path) -> Result<AirportTable, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    AirportTable::from_json(&text).map_err(|e| format!("parse {path:?}: {e}"))
}

/// Marker layout with every scale set for `elapsed_s` seconds after mount.
pub fn markers(
    people: &[Person],
    airports: &AirportTable,
    elapsed_s: Option<f64>,
) -> Result<MarkerLayout, String> {
    let mut layout = build_markers(people, airports).map_err(|e| e.to_string())?;
    if let Some(t) = elapsed_s {
        animate(&mut layout.markers, t);
    }
    Ok(layout)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupsReport {
    pub groups: Vec<GroupSummary>,
    pub unmatched: Vec<String>,
    pub excluded: usize,
}

pub fn groups(people: &[Person], airports: &AirportTable) -> Result<GroupsReport, String> {
    let joined = group_by_airport(people, airports).map_err(|e| e.to_string())?;
    let groups = joined
        .groups
        .iter()
        .map(|g| GroupSummary {
            code: g.code().to_string(),
            lat: g.airport.lat_deg,
            lon: g.airport.lon_deg,
            members: g.members.iter().map(|p| p.id.to_string()).collect(),
        })
        .collect();
    Ok(GroupsReport {
        groups,
        unmatched: joined.unmatched,
        excluded: joined.excluded,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::{groups, load_airports, load_people, markers};

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    const PEOPLE: &str = r#"[
        { "id": "rec1", "fullName": "Ada", "loggedHoursApproved": 3, "airport": "sfo" },
        { "id": "rec2", "fullName": "Grace", "loggedHoursCombined": 150, "airport": "SFO" },
        { "id": "rec3", "fullName": "Linus" },
        { "id": "rec4", "fullName": "Ken", "airport": "XYZ" }
    ]"#;

    const AIRPORTS: &str = r#"{
        "KSFO": { "iata": "SFO", "icao": "KSFO", "lat": 37.619, "lon": -122.375 }
    }"#;

    #[test]
    fn groups_report_lists_members_and_leftovers() {
        let people = load_people(write_temp(PEOPLE).path()).unwrap();
        let airports = load_airports(write_temp(AIRPORTS).path()).unwrap();

        let report = groups(&people, &airports).unwrap();
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].code, "SFO");
        assert_eq!(report.groups[0].members, vec!["rec1".to_string(), "rec2".to_string()]);
        assert_eq!(report.unmatched, vec!["XYZ".to_string()]);
        assert_eq!(report.excluded, 1);
    }

    #[test]
    fn markers_apply_requested_elapsed_time() {
        let people = load_people(write_temp(PEOPLE).path()).unwrap();
        let airports = load_airports(write_temp(AIRPORTS).path()).unwrap();

        let still = markers(&people, &airports, None).unwrap();
        assert!(still.markers.iter().all(|m| m.scale == 1.0));

        let blinking = markers(&people, &airports, Some(0.0)).unwrap();
        assert!(blinking.markers.iter().all(|m| m.scale == 0.0));
    }

    #[test]
    fn unreadable_files_report_the_path() {
        let err = load_people(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.contains("not/here.json"), "{err}");

        let bad = write_temp("{ not json");
        assert!(load_airports(bad.path()).unwrap_err().starts_with("parse"));
    }
}
