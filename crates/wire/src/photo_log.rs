//! Photo log wire model.
//!
//! A photo log lists finalized photos with the tags they were stored under. Every tag is
//! optional on the wire, matching the core's "any subset may be set" tag model.

use crate::{parse_strict, WireError, WireResult};
use chrono::{DateTime, Utc};
use dentfolio_types::{Angle, NonEmptyText, Stage, ToothNumber};
use dentfolio_uuid::PhotoId;
use serde::{Deserialize, Serialize};

/// Domain-level carrier for one stored photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoRecordData {
    pub photo_id: PhotoId,
    pub captured_at: DateTime<Utc>,
    pub procedure: Option<NonEmptyText>,
    pub tooth_number: Option<ToothNumber>,
    pub tooth_date: Option<DateTime<Utc>>,
    pub stage: Option<Stage>,
    pub angle: Option<Angle>,
}

/// Photo log operations.
pub struct PhotoLog;

impl PhotoLog {
    /// Parse a photo log from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] on schema mismatch, a non-canonical photo id, a tooth number
    /// outside 1 to 32, or a blank procedure.
    pub fn parse(yaml_text: &str) -> WireResult<Vec<PhotoRecordData>> {
        let wire: PhotoLogWire = parse_strict(yaml_text, "Photo log")?;

        wire.photos
            .into_iter()
            .enumerate()
            .map(|(i, photo)| record_to_domain(i, photo))
            .collect()
    }

    /// Render photo records as a YAML photo log.
    pub fn render(records: &[PhotoRecordData]) -> WireResult<String> {
        let wire = PhotoLogWire {
            photos: records.iter().map(record_to_wire).collect(),
        };
        serde_yaml::to_string(&wire)
            .map_err(|e| WireError::Translation(format!("Failed to serialize photo log: {e}")))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PhotoLogWire {
    #[serde(default)]
    photos: Vec<PhotoRecordWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PhotoRecordWire {
    photo_id: String,
    captured_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    procedure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tooth_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tooth_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    angle: Option<Angle>,
}

fn record_to_domain(index: usize, wire: PhotoRecordWire) -> WireResult<PhotoRecordData> {
    let photo_id = PhotoId::parse(&wire.photo_id)
        .map_err(|e| WireError::InvalidUuid(format!("photos[{index}].photo_id: {e}")))?;

    let procedure = wire
        .procedure
        .map(NonEmptyText::new)
        .transpose()
        .map_err(|e| WireError::InvalidInput(format!("photos[{index}].procedure: {e}")))?;

    let tooth_number = wire
        .tooth_number
        .map(ToothNumber::new)
        .transpose()
        .map_err(|e| WireError::InvalidInput(format!("photos[{index}].tooth_number: {e}")))?;

    Ok(PhotoRecordData {
        photo_id,
        captured_at: wire.captured_at,
        procedure,
        tooth_number,
        tooth_date: wire.tooth_date,
        stage: wire.stage,
        angle: wire.angle,
    })
}

fn record_to_wire(data: &PhotoRecordData) -> PhotoRecordWire {
    PhotoRecordWire {
        photo_id: data.photo_id.to_string(),
        captured_at: data.captured_at,
        procedure: data.procedure.as_ref().map(|p| p.to_string()),
        tooth_number: data.tooth_number.map(|t| i64::from(t.get())),
        tooth_date: data.tooth_date,
        stage: data.stage,
        angle: data.angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"photos:
  - photo_id: 550e8400e29b41d4a716446655440000
    captured_at: "2026-10-01T10:00:00Z"
    procedure: Class II composite
    tooth_number: 14
    tooth_date: "2026-10-01T00:00:00Z"
    stage: Preparation
    angle: Occlusal
  - photo_id: 00112233445566778899aabbccddeeff
    captured_at: "2026-10-01T10:05:00Z"
"#;

    #[test]
    fn parses_tagged_and_untagged_photos() {
        let records = PhotoLog::parse(SAMPLE).expect("parse sample");

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].procedure.as_ref().map(|p| p.as_str()),
            Some("Class II composite")
        );
        assert_eq!(records[0].tooth_number.map(|t| t.get()), Some(14));
        assert_eq!(records[0].angle, Some(Angle::Occlusal));
        assert!(records[1].procedure.is_none());
        assert!(records[1].stage.is_none());
    }

    #[test]
    fn empty_log_parses_to_no_records() {
        assert!(PhotoLog::parse("photos: []\n").unwrap().is_empty());
    }

    #[test]
    fn render_then_parse_preserves_records() {
        let records = PhotoLog::parse(SAMPLE).unwrap();
        let rendered = PhotoLog::render(&records).unwrap();

        assert_eq!(PhotoLog::parse(&rendered).unwrap(), records);
    }

    #[test]
    fn rejects_hyphenated_photo_id() {
        let input = SAMPLE.replace(
            "550e8400e29b41d4a716446655440000",
            "550e8400-e29b-41d4-a716-446655440000",
        );

        assert!(matches!(
            PhotoLog::parse(&input),
            Err(WireError::InvalidUuid(msg)) if msg.contains("photos[0].photo_id")
        ));
    }

    #[test]
    fn rejects_tooth_number_out_of_range() {
        let input = SAMPLE.replace("tooth_number: 14", "tooth_number: 40");

        assert!(matches!(
            PhotoLog::parse(&input),
            Err(WireError::InvalidInput(msg)) if msg.contains("tooth_number")
        ));
    }

    #[test]
    fn unclosed_sequence_is_invalid_yaml() {
        let err = PhotoLog::parse("photos: [\n").unwrap_err();

        assert!(matches!(err, WireError::InvalidYaml(_)), "{err:?}");
    }

    #[test]
    fn rejects_unknown_stage_label() {
        let input = SAMPLE.replace("stage: Preparation", "stage: Polishing");

        assert!(matches!(
            PhotoLog::parse(&input),
            Err(WireError::Translation(msg)) if msg.contains("photos[0].stage")
        ));
    }
}
