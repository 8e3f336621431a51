//! Location and iBeacon relevance data.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of locations or beacons a device will honor.
pub const MAX_RELEVANT_REGIONS: usize = 10;

/// A geographic location where the pass becomes relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            relevant_text: None,
        }
    }

    /// Altitude in meters.
    pub fn altitude(mut self, meters: f64) -> Self {
        self.altitude = Some(meters);
        self
    }

    /// Text shown on the lock screen when the pass is relevant.
    pub fn relevant_text(mut self, text: impl Into<String>) -> Self {
        self.relevant_text = Some(text.into());
        self
    }

    pub(crate) fn validate(&self, path: &str) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::validation(
                format!("{path}.latitude"),
                format!("{} is outside [-90, 90]", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::validation(
                format!("{path}.longitude"),
                format!("{} is outside [-180, 180]", self.longitude),
            ));
        }
        if let Some(altitude) = self.altitude {
            if !altitude.is_finite() {
                return Err(Error::validation(format!("{path}.altitude"), "must be finite"));
            }
        }
        Ok(())
    }
}

/// A Bluetooth Low Energy beacon region where the pass becomes relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beacon {
    #[serde(rename = "proximityUUID")]
    pub proximity_uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
}

impl Beacon {
    pub fn new(proximity_uuid: Uuid) -> Self {
        Self {
            proximity_uuid,
            major: None,
            minor: None,
            relevant_text: None,
        }
    }

    pub fn major(mut self, major: u16) -> Self {
        self.major = Some(major);
        self
    }

    pub fn minor(mut self, minor: u16) -> Self {
        self.minor = Some(minor);
        self
    }

    pub fn relevant_text(mut self, text: impl Into<String>) -> Self {
        self.relevant_text = Some(text.into());
        self
    }

    pub(crate) fn validate(&self, path: &str) -> Result<()> {
        // A beacon region narrows by major first, then minor.
        if self.minor.is_some() && self.major.is_none() {
            return Err(Error::validation(format!("{path}.minor"), "requires a major value"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ranges() {
        assert!(Location::new(48.85, 2.35).validate("locations[0]").is_ok());
        assert!(Location::new(-90.0, 180.0).validate("locations[0]").is_ok());

        let err = Location::new(91.0, 0.0).validate("locations[2]").unwrap_err();
        assert!(err.to_string().contains("locations[2].latitude"));

        assert!(Location::new(0.0, -180.5).validate("locations[0]").is_err());
        assert!(Location::new(f64::NAN, 0.0).validate("locations[0]").is_err());
        assert!(Location::new(0.0, 0.0)
            .altitude(f64::INFINITY)
            .validate("locations[0]")
            .is_err());
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let value = serde_json::to_value(Location::new(1.0, 2.0).relevant_text("Gate 4")).unwrap();
        assert_eq!(value["relevantText"], "Gate 4");
        assert!(value.get("altitude").is_none());
    }

    #[test]
    fn test_beacon_uuid_key_and_minor_rule() {
        let uuid = Uuid::parse_str("E2C56DB5-DFFB-48D2-B060-D0F5A71096E0").unwrap();
        let value = serde_json::to_value(Beacon::new(uuid).major(1).minor(2)).unwrap();
        assert!(value.get("proximityUUID").is_some());
        assert_eq!(value["major"], 1);

        assert!(Beacon::new(uuid).minor(2).validate("beacons[0]").is_err());
        assert!(Beacon::new(uuid).major(7).validate("beacons[0]").is_ok());
    }
}
