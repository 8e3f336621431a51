//! The [`Pass`] entity and its canonical JSON encoding.

use super::barcode::Barcode;
use super::color::Color;
use super::fields::{Field, FieldGroup, PassFields};
use super::relevance::{Beacon, Location, MAX_RELEVANT_REGIONS};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Version of the pass file format written to `formatVersion`.
pub const FORMAT_VERSION: u32 = 1;

/// Minimum length of a web service authentication token.
pub const MIN_AUTHENTICATION_TOKEN_LEN: usize = 16;

/// Mode of transport of a boarding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitType {
    #[serde(rename = "PKTransitTypeAir")]
    Air,
    #[serde(rename = "PKTransitTypeBoat")]
    Boat,
    #[serde(rename = "PKTransitTypeBus")]
    Bus,
    #[serde(rename = "PKTransitTypeGeneric")]
    Generic,
    #[serde(rename = "PKTransitTypeTrain")]
    Train,
}

/// Visual style of a pass. Determines the dictionary holding the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassStyle {
    BoardingPass(TransitType),
    Coupon,
    EventTicket,
    #[default]
    Generic,
    StoreCard,
}

impl PassStyle {
    /// Key of the style dictionary in `pass.json`.
    pub fn json_key(&self) -> &'static str {
        match self {
            PassStyle::BoardingPass(_) => "boardingPass",
            PassStyle::Coupon => "coupon",
            PassStyle::EventTicket => "eventTicket",
            PassStyle::Generic => "generic",
            PassStyle::StoreCard => "storeCard",
        }
    }

    fn supports_grouping(&self) -> bool {
        matches!(self, PassStyle::BoardingPass(_) | PassStyle::EventTicket)
    }
}

/// Endpoint the device registers with to receive pass updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebService {
    pub url: String,
    pub authentication_token: String,
}

/// The triple that identifies a pass for its issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassIdentity<'a> {
    pub team_identifier: &'a str,
    pub pass_type_identifier: &'a str,
    pub serial_number: &'a str,
}

impl fmt::Display for PassIdentity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}/{}",
            self.team_identifier, self.pass_type_identifier, self.serial_number
        )
    }
}

/// A Wallet pass.
///
/// Build one with [`Pass::new`] and the chained setters, then hand it to
/// [`crate::PassPipeline`] or [`crate::PassBuilder`]. The pipeline only reads
/// the pass, through [`Pass::serialize`].
///
/// # Examples
///
/// ```
/// use wallet::{Barcode, BarcodeFormat, Field, FieldGroup, Pass, PassStyle};
///
/// let pass = Pass::new(PassStyle::EventTicket)
///     .pass_type_identifier("pass.com.example.event")
///     .serial_number("0001")
///     .team_identifier("TEAM123")
///     .organization_name("Example Co")
///     .description("Concert ticket")
///     .field(FieldGroup::Primary, Field::new("event", "Event", "The Band"))
///     .barcode(Barcode::new("0001", BarcodeFormat::Qr));
///
/// let json = pass.serialize()?;
/// assert_eq!(json, pass.serialize()?);
/// # Ok::<(), wallet::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pass {
    pub pass_type_identifier: String,
    pub serial_number: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub description: String,
    pub style: PassStyle,
    pub fields: PassFields,
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub label_color: Option<Color>,
    pub logo_text: Option<String>,
    pub barcodes: Vec<Barcode>,
    pub locations: Vec<Location>,
    pub beacons: Vec<Beacon>,
    pub max_distance: Option<f64>,
    pub relevant_date: Option<DateTime<FixedOffset>>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
    pub voided: bool,
    pub web_service: Option<WebService>,
    pub associated_store_identifiers: Vec<u64>,
    pub app_launch_url: Option<String>,
    pub user_info: Option<Value>,
    pub suppress_strip_shine: Option<bool>,
    pub sharing_prohibited: bool,
    pub grouping_identifier: Option<String>,
}

impl Pass {
    /// Create an empty pass of the given style.
    pub fn new(style: PassStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn pass_type_identifier(mut self, id: impl Into<String>) -> Self {
        self.pass_type_identifier = id.into();
        self
    }

    pub fn serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = serial.into();
        self
    }

    pub fn team_identifier(mut self, team: impl Into<String>) -> Self {
        self.team_identifier = team.into();
        self
    }

    pub fn organization_name(mut self, name: impl Into<String>) -> Self {
        self.organization_name = name.into();
        self
    }

    /// Accessibility description of the pass.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn foreground_color(mut self, color: Color) -> Self {
        self.foreground_color = Some(color);
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn label_color(mut self, color: Color) -> Self {
        self.label_color = Some(color);
        self
    }

    pub fn logo_text(mut self, text: impl Into<String>) -> Self {
        self.logo_text = Some(text.into());
        self
    }

    /// Append a field to a group.
    pub fn field(mut self, group: FieldGroup, field: Field) -> Self {
        self.fields.push(group, field);
        self
    }

    /// Append a barcode. The first one a device supports is displayed.
    pub fn barcode(mut self, barcode: Barcode) -> Self {
        self.barcodes.push(barcode);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn beacon(mut self, beacon: Beacon) -> Self {
        self.beacons.push(beacon);
        self
    }

    /// Maximum distance in meters from a location at which the pass is relevant.
    pub fn max_distance(mut self, meters: f64) -> Self {
        self.max_distance = Some(meters);
        self
    }

    pub fn relevant_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.relevant_date = Some(date);
        self
    }

    pub fn expiration_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn voided(mut self, voided: bool) -> Self {
        self.voided = voided;
        self
    }

    pub fn web_service(mut self, url: impl Into<String>, authentication_token: impl Into<String>) -> Self {
        self.web_service = Some(WebService {
            url: url.into(),
            authentication_token: authentication_token.into(),
        });
        self
    }

    pub fn associated_store_identifier(mut self, id: u64) -> Self {
        self.associated_store_identifiers.push(id);
        self
    }

    pub fn app_launch_url(mut self, url: impl Into<String>) -> Self {
        self.app_launch_url = Some(url.into());
        self
    }

    /// Custom data for the companion app. Not displayed.
    pub fn user_info(mut self, info: Value) -> Self {
        self.user_info = Some(info);
        self
    }

    pub fn suppress_strip_shine(mut self, suppress: bool) -> Self {
        self.suppress_strip_shine = Some(suppress);
        self
    }

    pub fn sharing_prohibited(mut self, prohibited: bool) -> Self {
        self.sharing_prohibited = prohibited;
        self
    }

    pub fn grouping_identifier(mut self, id: impl Into<String>) -> Self {
        self.grouping_identifier = Some(id.into());
        self
    }

    /// Identity of the pass for its issuer.
    pub fn identity(&self) -> PassIdentity<'_> {
        PassIdentity {
            team_identifier: &self.team_identifier,
            pass_type_identifier: &self.pass_type_identifier,
            serial_number: &self.serial_number,
        }
    }

    /// Check the pass against the rules of the pass file format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_pass_type_identifier(&self.pass_type_identifier)?;
        require("serialNumber", &self.serial_number)?;
        if self.serial_number.chars().any(char::is_control) {
            return Err(Error::validation("serialNumber", "contains control characters"));
        }
        validate_team_identifier(&self.team_identifier)?;
        require("organizationName", &self.organization_name)?;

        self.fields.validate()?;

        for (index, barcode) in self.barcodes.iter().enumerate() {
            barcode.validate(&format!("barcodes[{index}]"))?;
        }

        if self.locations.len() > MAX_RELEVANT_REGIONS {
            return Err(Error::validation(
                "locations",
                format!("at most {MAX_RELEVANT_REGIONS} locations are allowed"),
            ));
        }
        for (index, location) in self.locations.iter().enumerate() {
            location.validate(&format!("locations[{index}]"))?;
        }

        if self.beacons.len() > MAX_RELEVANT_REGIONS {
            return Err(Error::validation(
                "beacons",
                format!("at most {MAX_RELEVANT_REGIONS} beacons are allowed"),
            ));
        }
        for (index, beacon) in self.beacons.iter().enumerate() {
            beacon.validate(&format!("beacons[{index}]"))?;
        }

        if let Some(distance) = self.max_distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(Error::validation("maxDistance", "must be a positive number"));
            }
        }

        if let Some(ref service) = self.web_service {
            if !service.url.starts_with("https://") {
                return Err(Error::validation("webServiceURL", "must be an https URL"));
            }
            if service.authentication_token.len() < MIN_AUTHENTICATION_TOKEN_LEN {
                return Err(Error::validation(
                    "authenticationToken",
                    format!("must be at least {MIN_AUTHENTICATION_TOKEN_LEN} characters"),
                ));
            }
        }

        if self.app_launch_url.is_some() && self.associated_store_identifiers.is_empty() {
            return Err(Error::validation(
                "appLaunchURL",
                "requires associatedStoreIdentifiers",
            ));
        }

        if self.grouping_identifier.is_some() && !self.style.supports_grouping() {
            return Err(Error::validation(
                "groupingIdentifier",
                format!("not supported for {} passes", self.style.json_key()),
            ));
        }

        if let Some(ref info) = self.user_info {
            if !info.is_object() {
                return Err(Error::validation("userInfo", "must be a JSON object"));
            }
        }

        Ok(())
    }

    /// Build the `pass.json` document.
    pub fn to_json(&self) -> Result<Value> {
        self.validate()?;

        let mut doc = Map::new();
        doc.insert("formatVersion".into(), Value::from(FORMAT_VERSION));
        doc.insert("passTypeIdentifier".into(), Value::from(self.pass_type_identifier.as_str()));
        doc.insert("serialNumber".into(), Value::from(self.serial_number.as_str()));
        doc.insert("teamIdentifier".into(), Value::from(self.team_identifier.as_str()));
        doc.insert("organizationName".into(), Value::from(self.organization_name.as_str()));
        if !self.description.is_empty() {
            doc.insert("description".into(), Value::from(self.description.as_str()));
        }

        let colors = [
            ("foregroundColor", self.foreground_color),
            ("backgroundColor", self.background_color),
            ("labelColor", self.label_color),
        ];
        for (key, color) in colors {
            if let Some(color) = color {
                doc.insert(key.into(), Value::from(color.to_string()));
            }
        }
        if let Some(ref text) = self.logo_text {
            doc.insert("logoText".into(), Value::from(text.as_str()));
        }

        let mut style = Map::new();
        if let PassStyle::BoardingPass(transit) = self.style {
            style.insert("transitType".into(), serde_json::to_value(transit)?);
        }
        self.fields.write_groups(&mut style)?;
        doc.insert(self.style.json_key().into(), Value::Object(style));

        if !self.barcodes.is_empty() {
            doc.insert("barcodes".into(), serde_json::to_value(&self.barcodes)?);
            if let Some(legacy) = self.barcodes.iter().find(|b| b.format.is_legacy()) {
                doc.insert("barcode".into(), serde_json::to_value(legacy)?);
            }
        }

        if !self.locations.is_empty() {
            doc.insert("locations".into(), serde_json::to_value(&self.locations)?);
        }
        if !self.beacons.is_empty() {
            doc.insert("beacons".into(), serde_json::to_value(&self.beacons)?);
        }
        if let Some(distance) = self.max_distance {
            doc.insert("maxDistance".into(), Value::from(distance));
        }
        if let Some(date) = self.relevant_date {
            doc.insert("relevantDate".into(), Value::from(date.to_rfc3339()));
        }
        if let Some(date) = self.expiration_date {
            doc.insert("expirationDate".into(), Value::from(date.to_rfc3339()));
        }
        if self.voided {
            doc.insert("voided".into(), Value::Bool(true));
        }
        if let Some(ref service) = self.web_service {
            doc.insert("webServiceURL".into(), Value::from(service.url.as_str()));
            doc.insert(
                "authenticationToken".into(),
                Value::from(service.authentication_token.as_str()),
            );
        }
        if !self.associated_store_identifiers.is_empty() {
            doc.insert(
                "associatedStoreIdentifiers".into(),
                serde_json::to_value(&self.associated_store_identifiers)?,
            );
        }
        if let Some(ref url) = self.app_launch_url {
            doc.insert("appLaunchURL".into(), Value::from(url.as_str()));
        }
        if let Some(ref info) = self.user_info {
            doc.insert("userInfo".into(), info.clone());
        }
        if let Some(suppress) = self.suppress_strip_shine {
            doc.insert("suppressStripShine".into(), Value::Bool(suppress));
        }
        if self.sharing_prohibited {
            doc.insert("sharingProhibited".into(), Value::Bool(true));
        }
        if let Some(ref id) = self.grouping_identifier {
            doc.insert("groupingIdentifier".into(), Value::from(id.as_str()));
        }

        Ok(canonicalize(Value::Object(doc)))
    }

    /// Serialize the pass to canonical `pass.json` bytes.
    ///
    /// Object keys are sorted at every level and arrays keep their order, so
    /// an unchanged pass always serializes to identical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a required field is missing or a
    /// value is malformed. No output is produced in that case.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let doc = self.to_json()?;
        Ok(serde_json::to_vec(&doc)?)
    }
}

/// Rebuild every object with its keys in lexicographic order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(())
}

/// `pass.` followed by reverse-DNS labels.
fn validate_pass_type_identifier(id: &str) -> Result<()> {
    require("passTypeIdentifier", id)?;

    let rest = id.strip_prefix("pass.").ok_or_else(|| {
        Error::validation("passTypeIdentifier", format!("`{id}` must start with `pass.`"))
    })?;

    let well_formed = rest
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    if !well_formed {
        return Err(Error::validation(
            "passTypeIdentifier",
            format!("`{id}` is not a reverse-DNS identifier"),
        ));
    }
    Ok(())
}

fn validate_team_identifier(team: &str) -> Result<()> {
    require("teamIdentifier", team)?;
    if !team.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::validation(
            "teamIdentifier",
            format!("`{team}` must be alphanumeric"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::{BarcodeFormat, DateStyle};

    fn minimal() -> Pass {
        Pass::new(PassStyle::Generic)
            .pass_type_identifier("pass.com.example.test")
            .serial_number("0001")
            .team_identifier("TEAM123")
            .organization_name("Example Co")
    }

    fn parse(pass: &Pass) -> Value {
        serde_json::from_slice(&pass.serialize().unwrap()).unwrap()
    }

    #[test]
    fn test_minimal_pass_serializes_required_keys() {
        let doc = parse(&minimal());
        assert_eq!(doc["formatVersion"], 1);
        assert_eq!(doc["passTypeIdentifier"], "pass.com.example.test");
        assert_eq!(doc["serialNumber"], "0001");
        assert_eq!(doc["teamIdentifier"], "TEAM123");
        assert_eq!(doc["organizationName"], "Example Co");
        assert!(doc["generic"].as_object().unwrap().is_empty());
        assert!(doc.get("description").is_none());
        assert!(doc.get("barcode").is_none());
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let pass = minimal()
            .description("Loyalty card")
            .field(FieldGroup::Primary, Field::new("points", "Points", 100i64))
            .field(FieldGroup::Back, Field::new("terms", "Terms", "None"))
            .user_info(serde_json::json!({"z": 1, "a": {"y": 2, "b": 3}}));

        let first = pass.serialize().unwrap();
        let second = pass.clone().serialize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_are_sorted() {
        let pass = minimal()
            .description("Sorted")
            .background_color(Color::rgb(0, 0, 0))
            .user_info(serde_json::json!({"zeta": 1, "alpha": 2}));
        let text = String::from_utf8(pass.serialize().unwrap()).unwrap();

        let position = |needle: &str| text.find(needle).unwrap();
        assert!(position("\"backgroundColor\"") < position("\"description\""));
        assert!(position("\"description\"") < position("\"formatVersion\""));
        assert!(position("\"teamIdentifier\"") < position("\"userInfo\""));
        assert!(position("\"alpha\"") < position("\"zeta\""));
    }

    #[test]
    fn test_missing_team_identifier() {
        let pass = Pass::new(PassStyle::Generic)
            .pass_type_identifier("pass.com.example.test")
            .serial_number("0001")
            .organization_name("Example Co");

        match pass.serialize() {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "teamIdentifier"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_required_fields_reported_by_name() {
        let cases = [
            (minimal().pass_type_identifier(""), "passTypeIdentifier"),
            (minimal().pass_type_identifier("com.example.test"), "passTypeIdentifier"),
            (minimal().pass_type_identifier("pass.com..test"), "passTypeIdentifier"),
            (minimal().serial_number("  "), "serialNumber"),
            (minimal().organization_name(""), "organizationName"),
            (minimal().team_identifier("TEAM 123"), "teamIdentifier"),
        ];

        for (pass, expected) in cases {
            match pass.validate() {
                Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_boarding_pass_layout() {
        let pass = minimal()
            .pass_type_identifier("pass.com.example.flight")
            .field(FieldGroup::Primary, Field::new("origin", "From", "SFO"))
            .field(FieldGroup::Primary, Field::new("destination", "To", "JFK"));
        let pass = Pass {
            style: PassStyle::BoardingPass(TransitType::Air),
            ..pass
        };

        let doc = parse(&pass);
        let style = &doc["boardingPass"];
        assert_eq!(style["transitType"], "PKTransitTypeAir");
        let primary = style["primaryFields"].as_array().unwrap();
        assert_eq!(primary[0]["key"], "origin");
        assert_eq!(primary[1]["key"], "destination");
        assert!(doc.get("generic").is_none());
    }

    #[test]
    fn test_legacy_barcode_skips_code128() {
        let pass = minimal()
            .barcode(Barcode::new("ABC", BarcodeFormat::Code128))
            .barcode(Barcode::new("ABC", BarcodeFormat::Pdf417).alt_text("ABC"));

        let doc = parse(&pass);
        assert_eq!(doc["barcodes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["barcode"]["format"], "PKBarcodeFormatPDF417");
        assert_eq!(doc["barcode"]["messageEncoding"], "iso-8859-1");

        let only_code128 = minimal().barcode(Barcode::new("ABC", BarcodeFormat::Code128));
        assert!(parse(&only_code128).get("barcode").is_none());
    }

    #[test]
    fn test_unsupported_barcode_format_in_definition() {
        let json = r#"{
            "passTypeIdentifier": "pass.com.example.test",
            "serialNumber": "0001",
            "teamIdentifier": "TEAM123",
            "organizationName": "Example Co",
            "barcodes": [{"message": "1", "format": "PKBarcodeFormatUPC"}]
        }"#;
        assert!(serde_json::from_str::<Pass>(json).is_err());
    }

    #[test]
    fn test_relevance_and_lifecycle_keys() {
        let date = DateTime::parse_from_rfc3339("2030-01-01T09:00:00+01:00").unwrap();
        let pass = minimal()
            .location(Location::new(37.33, -122.03).relevant_text("Store nearby"))
            .max_distance(50.0)
            .relevant_date(date)
            .expiration_date(date)
            .voided(true)
            .foreground_color(Color::rgb(255, 255, 255))
            .field(FieldGroup::Secondary, Field::date("when", "When", date, DateStyle::Short));

        let doc = parse(&pass);
        assert_eq!(doc["locations"][0]["relevantText"], "Store nearby");
        assert_eq!(doc["relevantDate"], "2030-01-01T09:00:00+01:00");
        assert_eq!(doc["expirationDate"], "2030-01-01T09:00:00+01:00");
        assert_eq!(doc["voided"], true);
        assert_eq!(doc["maxDistance"], 50.0);
        assert_eq!(doc["foregroundColor"], "rgb(255, 255, 255)");
    }

    #[test]
    fn test_too_many_locations() {
        let mut pass = minimal();
        for i in 0..=MAX_RELEVANT_REGIONS {
            pass = pass.location(Location::new(i as f64, 0.0));
        }
        assert!(matches!(pass.validate(), Err(Error::Validation { field, .. }) if field == "locations"));
    }

    #[test]
    fn test_web_service_rules() {
        let ok = minimal().web_service("https://example.com/passes", "0123456789abcdef");
        let doc = parse(&ok);
        assert_eq!(doc["webServiceURL"], "https://example.com/passes");
        assert_eq!(doc["authenticationToken"], "0123456789abcdef");

        assert!(minimal().web_service("https://example.com", "short").validate().is_err());
        assert!(minimal()
            .web_service("http://example.com", "0123456789abcdef")
            .validate()
            .is_err());
    }

    #[test]
    fn test_app_launch_and_grouping_rules() {
        assert!(minimal().app_launch_url("myapp://open").validate().is_err());
        assert!(minimal()
            .associated_store_identifier(284882215)
            .app_launch_url("myapp://open")
            .validate()
            .is_ok());

        assert!(minimal().grouping_identifier("trip-1").validate().is_err());
        let ticket = Pass {
            style: PassStyle::EventTicket,
            ..minimal().grouping_identifier("festival")
        };
        assert!(ticket.validate().is_ok());
    }

    #[test]
    fn test_identity() {
        let pass = minimal();
        let identity = pass.identity();
        assert_eq!(identity.serial_number, "0001");
        assert_eq!(identity.to_string(), "TEAM123.pass.com.example.test/0001");
    }

    #[test]
    fn test_definition_round_trip_through_serde() {
        let pass = minimal()
            .field(FieldGroup::Header, Field::new("tier", "Tier", "Gold"))
            .barcode(Barcode::new("0001", BarcodeFormat::Qr));
        let definition = serde_json::to_string(&pass).unwrap();
        let loaded: Pass = serde_json::from_str(&definition).unwrap();
        assert_eq!(loaded, pass);
    }

    #[test]
    fn test_style_definition_syntax() {
        let style: PassStyle = serde_json::from_str(r#"{"boardingPass": "PKTransitTypeTrain"}"#).unwrap();
        assert_eq!(style, PassStyle::BoardingPass(TransitType::Train));
        let style: PassStyle = serde_json::from_str(r#""storeCard""#).unwrap();
        assert_eq!(style, PassStyle::StoreCard);
    }
}
