use std::collections::{BTreeSet, HashMap};

use crate::airport::{Airport, AirportTable};
use crate::error::DataValidationError;
use crate::person::Person;

/// People sharing one airport.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportGroup<'a> {
    pub airport: Airport,
    /// Members in input order.
    pub members: Vec<&'a Person>,
}

impl AirportGroup<'_> {
    pub fn code(&self) -> &str {
        &self.airport.code
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of joining people with the airport table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportGroups<'a> {
    /// Groups in order of first appearance in the input.
    pub groups: Vec<AirportGroup<'a>>,
    /// Normalized codes with no airport record (sorted, unique).
    pub unmatched: Vec<String>,
    /// People without an airport code.
    pub excluded: usize,
}

impl<'a> AirportGroups<'a> {
    pub fn get(&self, code: &str) -> Option<&AirportGroup<'a>> {
        self.groups.iter().find(|g| g.code() == code)
    }

    pub fn placed(&self) -> usize {
        self.groups.iter().map(AirportGroup::len).sum()
    }
}

/// Group people by airport and resolve each group's location.
///
/// Codes are grouped by the record they resolve to, so an IATA and an ICAO
/// code for one airport share a group; the group keeps the first code seen.
///
/// - People with no airport code are excluded (counted, not an error).
/// - Codes with no matching record drop their people (listed in `unmatched`,
///   not an error).
/// - A matched record with non-numeric coordinates fails the join.
pub fn group_by_airport<'a>(
    persons: &'a [Person],
    airports: &AirportTable,
) -> Result<AirportGroups<'a>, DataValidationError> {
    let mut groups: Vec<AirportGroup<'a>> = Vec::new();
    let mut slot_of: HashMap<&str, usize> = HashMap::new();
    let mut unmatched = BTreeSet::new();
    let mut excluded = 0usize;

    for person in persons {
        let Some(code) = person.airport_code() else {
            excluded += 1;
            continue;
        };
        let Some((key, record)) = airports.resolve(&code) else {
            unmatched.insert(code);
            continue;
        };
        match slot_of.get(key) {
            Some(&slot) => groups[slot].members.push(person),
            None => {
                slot_of.insert(key, groups.len());
                groups.push(AirportGroup {
                    airport: record.validate(&code)?,
                    members: vec![person],
                });
            }
        }
    }

    Ok(AirportGroups {
        groups,
        unmatched: unmatched.into_iter().collect(),
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::group_by_airport;
    use crate::airport::{AirportRecord, AirportTable};
    use crate::person::Person;

    fn sfo_only() -> AirportTable {
        AirportTable::from_records([(
            "KSFO".to_string(),
            AirportRecord::new("SFO", "KSFO", 37.619, -122.375),
        )])
    }

    #[test]
    fn groups_case_insensitively_and_drops_null_and_unmatched() {
        let persons = vec![
            Person::new("1", "One").with_airport("sfo"),
            Person::new("2", "Two").with_airport("SFO"),
            Person::new("3", "Three"),
            Person::new("4", "Four").with_airport("xyz"),
        ];
        let groups = group_by_airport(&persons, &sfo_only()).unwrap();

        assert_eq!(groups.groups.len(), 1);
        let sfo = groups.get("SFO").unwrap();
        let ids: Vec<_> = sfo.members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(groups.unmatched, vec!["XYZ".to_string()]);
        assert_eq!(groups.excluded, 1);
        assert_eq!(groups.placed(), 2);
    }

    #[test]
    fn icao_codes_join_the_same_airport() {
        let persons = vec![Person::new("1", "One").with_airport("ksfo")];
        let groups = group_by_airport(&persons, &sfo_only()).unwrap();
        assert_eq!(groups.groups[0].code(), "KSFO");
        assert_eq!(groups.groups[0].airport.lat_deg, 37.619);
    }

    #[test]
    fn group_order_follows_first_appearance() {
        let table = AirportTable::from_records([
            ("EGLL".to_string(), AirportRecord::new("LHR", "EGLL", 51.47, -0.454)),
            ("KSFO".to_string(), AirportRecord::new("SFO", "KSFO", 37.619, -122.375)),
        ]);
        let persons = vec![
            Person::new("1", "One").with_airport("SFO"),
            Person::new("2", "Two").with_airport("LHR"),
            Person::new("3", "Three").with_airport("sfo"),
            Person::new("4", "Four").with_airport("nope"),
            Person::new("5", "Five").with_airport("NOPE"),
        ];
        let groups = group_by_airport(&persons, &table).unwrap();
        let codes: Vec<_> = groups.groups.iter().map(|g| (g.code(), g.len())).collect();
        assert_eq!(codes, vec![("SFO", 2), ("LHR", 1)]);
        assert_eq!(groups.unmatched, vec!["NOPE".to_string()]);
    }

    #[test]
    fn iata_and_icao_codes_share_one_group() {
        let persons = vec![
            Person::new("1", "One").with_airport("SFO"),
            Person::new("2", "Two").with_airport("KSFO"),
            Person::new("3", "Three").with_airport("sfo"),
        ];
        let groups = group_by_airport(&persons, &sfo_only()).unwrap();

        assert_eq!(groups.groups.len(), 1);
        assert_eq!(groups.groups[0].code(), "SFO");
        let ids: Vec<_> = groups.groups[0].members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn malformed_coordinates_fail_the_join() {
        let table = AirportTable::from_json(
            r#"{ "X": { "iata": "BAD", "icao": "XBAD", "lat": "??", "lon": 0 } }"#,
        )
        .unwrap();
        let persons = vec![Person::new("1", "One").with_airport("bad")];
        let err = group_by_airport(&persons, &table).unwrap_err();
        assert_eq!(err.code, "BAD");
        assert_eq!(err.field, "lat");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = group_by_airport(&[], &AirportTable::new()).unwrap();
        assert!(groups.groups.is_empty());
        assert!(groups.unmatched.is_empty());
        assert_eq!(groups.excluded, 0);
    }
}
