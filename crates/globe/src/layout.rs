use foundation::math::MARKER_RADIUS;
use serde::Serialize;

use crate::airport::AirportTable;
use crate::cluster::offset_positions;
use crate::error::DataValidationError;
use crate::join::group_by_airport;
use crate::marker::Marker;
use crate::person::Person;

/// Markers derived from one snapshot of people and airports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerLayout {
    /// One marker per placed person, grouped by airport in first-appearance
    /// order, input order within a group.
    pub markers: Vec<Marker>,
    /// Airport codes that matched no record.
    pub unmatched: Vec<String>,
    /// People with no airport code.
    pub excluded: usize,
}

impl MarkerLayout {
    pub fn marker(&self, person_id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.person_id.as_str() == person_id)
    }
}

/// Join, project, spread and classify: the whole layout in one pass.
pub fn build_markers(
    persons: &[Person],
    airports: &AirportTable,
) -> Result<MarkerLayout, DataValidationError> {
    let groups = group_by_airport(persons, airports)?;
    let mut markers = Vec::with_capacity(groups.placed());

    for group in &groups.groups {
        let base = group.airport.position(MARKER_RADIUS);
        let positions = offset_positions(base, group.len());
        for (person, position) in group.members.iter().zip(positions) {
            markers.push(Marker::new(person, group.code(), position));
        }
    }

    Ok(MarkerLayout {
        markers,
        unmatched: groups.unmatched,
        excluded: groups.excluded,
    })
}
