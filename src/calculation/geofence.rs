//! Office geofence classification.
//!
//! An event counts as in-office (내근) when the device reports the office
//! Wi-Fi network or its coordinate lies within the office radius. Anything
//! else is left unclassified so the user can choose 외근 or 재택.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OfficeLocation;
use crate::models::{EngineWarning, WorkType};

use super::event_series::{is_valid_coordinate, parse_coordinates};

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// The network the device reported when the event was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiSignal {
    /// Detected SSID.
    pub ssid: String,
}

/// Which check placed an event inside the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    /// The office Wi-Fi network was detected.
    Wifi,
    /// The coordinate is within the geofence radius.
    Geofence,
}

/// Detailed classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// `Some(내근)` when inside the office, otherwise `None`.
    pub work_type: Option<WorkType>,
    /// True when the user must pick 외근 or 재택.
    pub requires_manual_choice: bool,
    /// Distance to the office, when both coordinates are usable.
    pub distance_meters: Option<f64>,
    /// The check that matched.
    pub matched_by: Option<MatchReason>,
    /// Degraded paths taken.
    pub warnings: Vec<EngineWarning>,
}

impl Classification {
    fn manual(distance_meters: Option<f64>, warnings: Vec<EngineWarning>) -> Self {
        Self {
            work_type: None,
            requires_manual_choice: true,
            distance_meters,
            matched_by: None,
            warnings,
        }
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::distance_meters;
///
/// let d = distance_meters(37.5362819, 126.8949029, 37.5362819, 126.8949029);
/// assert!(d.abs() < 1e-6);
/// ```
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Classifies a coordinate against the office geofence.
///
/// Returns the full decision including distance and the matching check.
/// Without an office configuration the result always requires a manual
/// choice and carries a `OFFICE_NOT_CONFIGURED` warning.
pub fn classify_detailed(
    latitude: f64,
    longitude: f64,
    office: Option<&OfficeLocation>,
    wifi: Option<&WifiSignal>,
) -> Classification {
    let Some(office) = office else {
        warn!("No office configured, work type requires manual selection");
        return Classification::manual(
            None,
            vec![EngineWarning::configuration_missing(
                "OFFICE_NOT_CONFIGURED",
                "office location is not configured",
            )],
        );
    };

    let distance = is_valid_coordinate(latitude, longitude).then(|| {
        distance_meters(latitude, longitude, office.latitude, office.longitude)
    });

    let wifi_match = match (&office.wifi, wifi) {
        (Some(policy), Some(signal)) => policy.enabled && policy.ssid == signal.ssid,
        _ => false,
    };

    let matched_by = if wifi_match {
        Some(MatchReason::Wifi)
    } else if distance.is_some_and(|d| d <= office.radius_meters) {
        Some(MatchReason::Geofence)
    } else {
        None
    };

    debug!(
        latitude,
        longitude,
        distance = ?distance,
        matched = ?matched_by,
        "Classified coordinate"
    );

    match matched_by {
        Some(reason) => Classification {
            work_type: Some(WorkType::InOffice),
            requires_manual_choice: false,
            distance_meters: distance,
            matched_by: Some(reason),
            warnings: Vec::new(),
        },
        None => Classification::manual(distance, Vec::new()),
    }
}

/// Classifies a coordinate: `Some(내근)` inside the office, `None` otherwise.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::classify;
/// use worktime_engine::config::OfficeLocation;
/// use worktime_engine::models::WorkType;
///
/// let office = OfficeLocation {
///     name: "본사".to_string(),
///     latitude: 37.5362819,
///     longitude: 126.8949029,
///     radius_meters: 300.0,
///     wifi: None,
/// };
///
/// assert_eq!(classify(37.5363, 126.8950, Some(&office), None), Some(WorkType::InOffice));
/// assert_eq!(classify(37.4, 127.1, Some(&office), None), None);
/// assert_eq!(classify(37.5363, 126.8950, None, None), None);
/// ```
pub fn classify(
    latitude: f64,
    longitude: f64,
    office: Option<&OfficeLocation>,
    wifi: Option<&WifiSignal>,
) -> Option<WorkType> {
    classify_detailed(latitude, longitude, office, wifi).work_type
}

/// Parses a coordinate string and classifies it.
///
/// Unparseable text is never classified: the result requires a manual choice
/// and carries a `COORDINATE_UNPARSEABLE` warning.
pub fn classify_coordinate_text(
    text: &str,
    office: Option<&OfficeLocation>,
    wifi: Option<&WifiSignal>,
) -> Classification {
    match parse_coordinates(text) {
        Some((latitude, longitude)) => classify_detailed(latitude, longitude, office, wifi),
        None => {
            warn!(text, "Unparseable coordinate text");
            Classification::manual(
                None,
                vec![EngineWarning::parse_failure(
                    "COORDINATE_UNPARSEABLE",
                    format!("coordinate text '{text}' could not be parsed"),
                )],
            )
        }
    }
}
