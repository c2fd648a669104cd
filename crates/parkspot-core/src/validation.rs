//! Structural validation of inbound parking spot payloads.
//!
//! Rules are checked field by field and every violation is collected, so a
//! caller fixing a payload sees all of its problems at once.

use crate::error::{FieldError, ValidationError};
use crate::spot::ParkingSpotPayload;

pub const SPOT_NUMBER_MAX_LEN: usize = 10;
pub const LICENSE_PLATE_MAX_LEN: usize = 7;
pub const BRAND_MAX_LEN: usize = 70;
pub const MODEL_MAX_LEN: usize = 70;
pub const COLOR_MAX_LEN: usize = 70;
pub const RESPONSIBLE_NAME_MAX_LEN: usize = 130;
pub const APARTMENT_MAX_LEN: usize = 30;
pub const BLOCK_MAX_LEN: usize = 30;

/// Validates every field of the payload.
///
/// Fields are reported in declaration order using their wire (camelCase)
/// names. Blank values count as missing.
pub fn validate(payload: &ParkingSpotPayload) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    check_text(&mut errors, "spotNumber", &payload.spot_number, SPOT_NUMBER_MAX_LEN);
    if check_text(
        &mut errors,
        "licensePlate",
        &payload.license_plate,
        LICENSE_PLATE_MAX_LEN,
    ) {
        check_plate_format(&mut errors, &payload.license_plate);
    }
    check_text(&mut errors, "brand", &payload.brand, BRAND_MAX_LEN);
    check_text(&mut errors, "model", &payload.model, MODEL_MAX_LEN);
    check_text(&mut errors, "color", &payload.color, COLOR_MAX_LEN);
    check_text(
        &mut errors,
        "responsibleName",
        &payload.responsible_name,
        RESPONSIBLE_NAME_MAX_LEN,
    );
    check_text(&mut errors, "apartment", &payload.apartment, APARTMENT_MAX_LEN);
    check_text(&mut errors, "block", &payload.block, BLOCK_MAX_LEN);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Returns `true` when the value passed the presence and length rules.
fn check_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
        return false;
    }

    let len = value.chars().count();
    if len > max {
        errors.push(FieldError::new(
            field,
            format!("size must be between 1 and {max}, got {len}"),
        ));
        return false;
    }

    true
}

fn check_plate_format(errors: &mut Vec<FieldError>, plate: &str) {
    if !plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(
            "licensePlate",
            format!("must contain only letters and digits: '{plate}'"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ParkingSpotPayload {
        ParkingSpotPayload::builder()
            .spot_number("A001")
            .license_plate("ABC1234")
            .brand("Toyota")
            .model("Corolla")
            .color("Silver")
            .responsible_name("Maria Souza")
            .apartment("101")
            .block("A")
            .build()
    }

    fn fields(err: ValidationError) -> Vec<&'static str> {
        err.errors().iter().map(|e| e.field).collect()
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let err = validate(&ParkingSpotPayload::default()).unwrap_err();
        assert_eq!(
            fields(err),
            vec![
                "spotNumber",
                "licensePlate",
                "brand",
                "model",
                "color",
                "responsibleName",
                "apartment",
                "block"
            ]
        );
    }

    #[test]
    fn blank_counts_as_missing() {
        let mut payload = valid();
        payload.color = "   ".into();
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.errors()[0], FieldError::new("color", "must not be blank"));
    }

    #[test]
    fn rejects_over_long_values() {
        let mut payload = valid();
        payload.spot_number = "S".repeat(SPOT_NUMBER_MAX_LEN + 1);
        payload.responsible_name = "n".repeat(RESPONSIBLE_NAME_MAX_LEN + 1);
        let err = validate(&payload).unwrap_err();
        assert_eq!(fields(err), vec!["spotNumber", "responsibleName"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut payload = valid();
        payload.block = "é".repeat(BLOCK_MAX_LEN);
        assert!(validate(&payload).is_ok());
    }

    #[test]
    fn license_plate_format() {
        let mut payload = valid();
        payload.license_plate = "ABC1D23".into();
        assert!(validate(&payload).is_ok());

        payload.license_plate = "ABC1234X".into();
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(err.errors()[0].message.starts_with("size must be"));

        payload.license_plate = "AB-1234".into();
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert!(err.errors()[0].message.starts_with("must contain only"));
    }
}
