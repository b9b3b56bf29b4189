//! Tag selections and the finalized metadata they become.
//!
//! A [`TagSelection`] is what the clinician is choosing while a capture session runs. When the
//! session is finalized each kept photo is paired with a [`PhotoMetadata`] snapshot of the
//! selection, which is what the persistence collaborator stores and what the fulfilment engine
//! matches against requirements.

use crate::calendar::Calendar;
use crate::constants::{DAY_DISPLAY_FORMAT, EMPTY_TAG_SUMMARY, TAG_SUMMARY_SEPARATOR};
use crate::photo::TaggedPhoto;
use chrono::{DateTime, NaiveDate, Utc};
use dentfolio_types::{Angle, NonEmptyText, Stage, ToothNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pending classification values for the photos being captured.
///
/// Fields have no ordering dependency; any subset may be set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSelection {
    pub procedure: Option<NonEmptyText>,
    pub tooth_number: Option<ToothNumber>,
    pub tooth_date: Option<DateTime<Utc>>,
    pub stage: Option<Stage>,
    pub angle: Option<Angle>,
}

impl TagSelection {
    /// True once a procedure has been chosen.
    pub fn has_any_tag(&self) -> bool {
        self.procedure.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.procedure.is_some()
            && self.tooth_number.is_some()
            && self.tooth_date.is_some()
            && self.stage.is_some()
            && self.angle.is_some()
    }

    /// One-line summary: procedure, tooth, stage abbreviation, angle.
    pub fn display_summary(&self) -> String {
        summarise(
            self.procedure.as_ref(),
            self.tooth_number,
            self.stage,
            self.angle,
        )
    }

    pub fn tooth_entry(&self, calendar: Calendar) -> Option<ToothEntry> {
        ToothEntry::from_parts(
            self.procedure.as_ref(),
            self.tooth_number,
            self.tooth_date,
            calendar,
        )
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The persisted, finalized tags of a stored photo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub procedure: Option<NonEmptyText>,
    pub tooth_number: Option<ToothNumber>,
    pub tooth_date: Option<DateTime<Utc>>,
    pub stage: Option<Stage>,
    pub angle: Option<Angle>,
}

impl PhotoMetadata {
    pub fn is_complete(&self) -> bool {
        self.procedure.is_some()
            && self.tooth_number.is_some()
            && self.tooth_date.is_some()
            && self.stage.is_some()
            && self.angle.is_some()
    }

    pub fn display_summary(&self) -> String {
        summarise(
            self.procedure.as_ref(),
            self.tooth_number,
            self.stage,
            self.angle,
        )
    }

    pub fn tooth_entry(&self, calendar: Calendar) -> Option<ToothEntry> {
        ToothEntry::from_parts(
            self.procedure.as_ref(),
            self.tooth_number,
            self.tooth_date,
            calendar,
        )
    }
}

impl From<&TagSelection> for PhotoMetadata {
    fn from(tags: &TagSelection) -> Self {
        Self {
            procedure: tags.procedure.clone(),
            tooth_number: tags.tooth_number,
            tooth_date: tags.tooth_date,
            stage: tags.stage,
            angle: tags.angle,
        }
    }
}

fn summarise(
    procedure: Option<&NonEmptyText>,
    tooth_number: Option<ToothNumber>,
    stage: Option<Stage>,
    angle: Option<Angle>,
) -> String {
    let parts: Vec<String> = [
        procedure.map(|p| p.to_string()),
        tooth_number.map(|t| format!("#{t}")),
        stage.map(|s| s.abbreviation().to_string()),
        angle.map(|a| a.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        EMPTY_TAG_SUMMARY.to_string()
    } else {
        parts.join(TAG_SUMMARY_SEPARATOR)
    }
}

/// One physical tooth, procedure and day.
///
/// Photos of the same occasion across stages and angles share an entry. The date is held at
/// calendar-day granularity, so two captures on the same day collapse to one entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ToothEntry {
    pub procedure: NonEmptyText,
    pub tooth_number: ToothNumber,
    pub date: NaiveDate,
}

impl ToothEntry {
    fn from_parts(
        procedure: Option<&NonEmptyText>,
        tooth_number: Option<ToothNumber>,
        tooth_date: Option<DateTime<Utc>>,
        calendar: Calendar,
    ) -> Option<Self> {
        Some(Self {
            procedure: procedure?.clone(),
            tooth_number: tooth_number?,
            date: calendar.day_of(tooth_date?),
        })
    }

    /// Groups photos by tooth entry, in order of each entry's first appearance.
    ///
    /// Photos without a procedure, tooth number or date belong to no entry and are skipped.
    pub fn group<'a>(
        photos: &'a [TaggedPhoto],
        calendar: Calendar,
    ) -> Vec<(ToothEntry, Vec<&'a TaggedPhoto>)> {
        let mut groups: Vec<(ToothEntry, Vec<&'a TaggedPhoto>)> = Vec::new();

        for photo in photos {
            let Some(entry) = photo.metadata.tooth_entry(calendar) else {
                continue;
            };
            match groups.iter_mut().find(|(existing, _)| *existing == entry) {
                Some((_, members)) => members.push(photo),
                None => groups.push((entry, vec![photo])),
            }
        }

        groups
    }
}

impl fmt::Display for ToothEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({})",
            self.procedure,
            self.tooth_number,
            self.date.format(DAY_DISPLAY_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dentfolio_uuid::PhotoId;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn complete_tags() -> TagSelection {
        TagSelection {
            procedure: Some(text("Class II composite")),
            tooth_number: Some(ToothNumber::new(14).unwrap()),
            tooth_date: Some(Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap()),
            stage: Some(Stage::Preparation),
            angle: Some(Angle::Occlusal),
        }
    }

    #[test]
    fn empty_selection_has_placeholder_summary() {
        let tags = TagSelection::default();

        assert!(!tags.has_any_tag());
        assert!(!tags.is_complete());
        assert_eq!(tags.display_summary(), EMPTY_TAG_SUMMARY);
    }

    #[test]
    fn summary_orders_fields_and_abbreviates_stage() {
        let tags = complete_tags();
        assert_eq!(
            tags.display_summary(),
            "Class II composite · #14 · Prep · Occlusal"
        );

        let partial = TagSelection {
            stage: Some(Stage::Restoration),
            angle: Some(Angle::BuccalFacial),
            ..TagSelection::default()
        };
        assert_eq!(partial.display_summary(), "Resto · Buccal/Facial");
    }

    #[test]
    fn has_any_tag_tracks_procedure_only() {
        let tags = TagSelection {
            tooth_number: Some(ToothNumber::new(3).unwrap()),
            ..TagSelection::default()
        };
        assert!(!tags.has_any_tag());

        let tags = TagSelection {
            procedure: Some(text("Crown")),
            ..TagSelection::default()
        };
        assert!(tags.has_any_tag());
        assert!(!tags.is_complete());
    }

    #[test]
    fn complete_requires_all_five_fields() {
        let mut tags = complete_tags();
        assert!(tags.is_complete());

        tags.tooth_date = None;
        assert!(!tags.is_complete());
    }

    #[test]
    fn metadata_mirrors_selection() {
        let tags = complete_tags();
        let metadata = PhotoMetadata::from(&tags);

        assert!(metadata.is_complete());
        assert_eq!(metadata.display_summary(), tags.display_summary());
        assert_eq!(
            metadata.tooth_entry(Calendar::utc()),
            tags.tooth_entry(Calendar::utc())
        );
    }

    #[test]
    fn tooth_entry_collapses_same_calendar_day() {
        let mut morning = complete_tags();
        morning.tooth_date = Some(Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap());
        let mut evening = complete_tags();
        evening.tooth_date = Some(Utc.with_ymd_and_hms(2026, 10, 17, 22, 0, 0).unwrap());
        evening.stage = Some(Stage::Restoration);

        let cal = Calendar::utc();
        assert_eq!(morning.tooth_entry(cal), evening.tooth_entry(cal));

        let mut next_day = complete_tags();
        next_day.tooth_date = Some(Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap());
        assert_ne!(morning.tooth_entry(cal), next_day.tooth_entry(cal));
    }

    #[test]
    fn tooth_entry_needs_procedure_tooth_and_date() {
        let mut tags = complete_tags();
        tags.tooth_number = None;
        assert!(tags.tooth_entry(Calendar::utc()).is_none());
    }

    #[test]
    fn group_preserves_first_seen_order() {
        let cal = Calendar::utc();
        let at = |h| Utc.with_ymd_and_hms(2026, 10, 17, h, 0, 0).unwrap();
        let photo = |tooth: i64, hour| TaggedPhoto {
            id: PhotoId::new(),
            captured_at: at(hour),
            metadata: PhotoMetadata {
                tooth_number: Some(ToothNumber::new(tooth).unwrap()),
                tooth_date: Some(at(hour)),
                ..PhotoMetadata::from(&complete_tags())
            },
        };
        let untagged = TaggedPhoto {
            id: PhotoId::new(),
            captured_at: at(12),
            metadata: PhotoMetadata::default(),
        };
        let photos = vec![photo(14, 9), photo(3, 10), untagged, photo(14, 11)];

        let groups = ToothEntry::group(&photos, cal);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.tooth_number.get(), 14);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0.tooth_number.get(), 3);
        assert_eq!(groups[0].0.to_string(), "Class II composite #14 (2026-10-17)");
    }
}
