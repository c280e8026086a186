//! Placing a neighborhood of people on a globe.
//!
//! Pipeline: [`join::group_by_airport`] buckets people by airport,
//! [`cluster::offset_positions`] spreads each bucket around its airport,
//! [`marker::classify`] picks a color and size, and
//! [`animation::animate`] drives the per-frame blink.

pub mod airport;
pub mod animation;
pub mod cluster;
pub mod error;
pub mod join;
pub mod layout;
pub mod marker;
pub mod person;
pub mod picking;
pub mod view;

pub use airport::{Airport, AirportRecord, AirportTable, Coordinate};
pub use error::DataValidationError;
pub use join::{AirportGroup, AirportGroups, group_by_airport};
pub use layout::{MarkerLayout, build_markers};
pub use marker::{Marker, MarkerColor, MarkerStyle, classify};
pub use person::{Person, PersonId, PersonRecord, Tier};
pub use view::{GlobeEvent, GlobeSnapshot, GlobeView, MountedGlobe, NavigationRequest};
