use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Server-generated identifier of a parking spot record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(Uuid);

impl SpotId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for SpotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Reads `null` as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inbound data for creating or updating a parking spot.
///
/// Missing and `null` fields deserialize as empty strings so that validation
/// can report them alongside every other violated rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
#[builder(field_defaults(default, setter(into)))]
pub struct ParkingSpotPayload {
    #[serde(deserialize_with = "null_as_empty")]
    pub spot_number: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub license_plate: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub color: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub responsible_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub apartment: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub block: String,
}

impl ParkingSpotPayload {
    /// Strips surrounding whitespace from every field.
    pub fn trimmed(self) -> Self {
        fn trim(value: String) -> String {
            let trimmed = value.trim();
            if trimmed.len() == value.len() {
                value
            } else {
                trimmed.to_owned()
            }
        }

        Self {
            spot_number: trim(self.spot_number),
            license_plate: trim(self.license_plate),
            brand: trim(self.brand),
            model: trim(self.model),
            color: trim(self.color),
            responsible_name: trim(self.responsible_name),
            apartment: trim(self.apartment),
            block: trim(self.block),
        }
    }
}

/// A persisted parking spot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: SpotId,
    pub spot_number: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub responsible_name: String,
    pub apartment: String,
    pub block: String,
    /// Set once at creation; updates never touch it.
    pub registered_at: Timestamp,
}

impl ParkingSpot {
    /// Builds a new record from a validated payload.
    pub fn register(id: SpotId, payload: ParkingSpotPayload, registered_at: Timestamp) -> Self {
        Self {
            id,
            spot_number: payload.spot_number,
            license_plate: payload.license_plate,
            brand: payload.brand,
            model: payload.model,
            color: payload.color,
            responsible_name: payload.responsible_name,
            apartment: payload.apartment,
            block: payload.block,
            registered_at,
        }
    }

    /// Overwrites every caller-owned field, keeping `id` and `registered_at`.
    pub fn apply(&mut self, payload: ParkingSpotPayload) {
        self.spot_number = payload.spot_number;
        self.license_plate = payload.license_plate;
        self.brand = payload.brand;
        self.model = payload.model;
        self.color = payload.color;
        self.responsible_name = payload.responsible_name;
        self.apartment = payload.apartment;
        self.block = payload.block;
    }

    /// Whether this record occupies the given `(apartment, block)` pair.
    pub fn occupies(&self, apartment: &str, block: &str) -> bool {
        self.apartment == apartment && self.block == block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_id_round_trips_through_display() {
        let id = SpotId::generate();
        let parsed: SpotId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn spot_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SpotId>().is_err());
    }

    #[test]
    fn payload_missing_fields_default_to_empty() {
        let payload: ParkingSpotPayload =
            serde_json::from_str(r#"{"spotNumber":"A001","licensePlate":"ABC1234"}"#).unwrap();
        assert_eq!(payload.spot_number, "A001");
        assert_eq!(payload.license_plate, "ABC1234");
        assert!(payload.brand.is_empty());
    }

    #[test]
    fn payload_null_fields_read_as_empty() {
        let payload: ParkingSpotPayload =
            serde_json::from_str(r#"{"spotNumber":"A001","brand":null,"block":null}"#).unwrap();
        assert_eq!(payload.spot_number, "A001");
        assert!(payload.brand.is_empty());
        assert!(payload.block.is_empty());
    }

    #[test]
    fn payload_ignores_server_owned_fields() {
        let payload: ParkingSpotPayload = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000000","registeredAt":"2020-01-01T00:00:00Z","block":"A"}"#,
        )
        .unwrap();
        assert_eq!(payload.block, "A");
    }

    #[test]
    fn trimmed_strips_whitespace() {
        let payload = ParkingSpotPayload::builder()
            .spot_number("  A001 ")
            .block("B")
            .build()
            .trimmed();
        assert_eq!(payload.spot_number, "A001");
        assert_eq!(payload.block, "B");
    }

    #[test]
    fn apply_keeps_identity_and_registration() {
        let registered_at = Timestamp::from_second(1_700_000_000).unwrap();
        let id = SpotId::generate();
        let mut spot = ParkingSpot::register(
            id,
            ParkingSpotPayload::builder().spot_number("A001").build(),
            registered_at,
        );

        spot.apply(ParkingSpotPayload::builder().spot_number("B002").build());

        assert_eq!(spot.id, id);
        assert_eq!(spot.registered_at, registered_at);
        assert_eq!(spot.spot_number, "B002");
    }

    #[test]
    fn record_serializes_camel_case() {
        let spot = ParkingSpot::register(
            SpotId::generate(),
            ParkingSpotPayload::builder()
                .license_plate("ABC1234")
                .responsible_name("Ana")
                .build(),
            Timestamp::from_second(0).unwrap(),
        );
        let json = serde_json::to_value(&spot).unwrap();
        assert_eq!(json["licensePlate"], "ABC1234");
        assert_eq!(json["responsibleName"], "Ana");
        assert_eq!(json["registeredAt"], "1970-01-01T00:00:00Z");
    }
}
