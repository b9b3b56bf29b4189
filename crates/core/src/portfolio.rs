//! Portfolios and their photo requirements.

use crate::constants::DEFAULT_ANGLE_COUNT;
use crate::due::{DueStatus, DueStatusCalculator};
use crate::error::{CoreError, CoreResult};
use crate::tags::PhotoMetadata;
use chrono::{DateTime, Utc};
use dentfolio_types::{Angle, NonEmptyText, Stage};
use dentfolio_uuid::Uuid;
use std::collections::{BTreeMap, BTreeSet};

/// How many tagged photos one procedure needs, per stage and angle.
///
/// Constructed through [`PortfolioRequirement::new`], which guarantees every listed angle has
/// a positive count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortfolioRequirement {
    id: Uuid,
    procedure: NonEmptyText,
    stages: BTreeSet<Stage>,
    angles: BTreeSet<Angle>,
    angle_counts: BTreeMap<Angle, u32>,
    total_required: u32,
}

impl PortfolioRequirement {
    /// Build a requirement, filling a count of 1 for any listed angle without one.
    ///
    /// Counts given for angles that are not listed are dropped. Empty `stages` or `angles`
    /// are accepted and yield a requirement that needs nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if a listed angle has an explicit count of zero, or
    /// if the total number of photos needed does not fit in a `u32`.
    pub fn new(
        id: Uuid,
        procedure: NonEmptyText,
        stages: impl IntoIterator<Item = Stage>,
        angles: impl IntoIterator<Item = Angle>,
        angle_counts: impl IntoIterator<Item = (Angle, u32)>,
    ) -> CoreResult<Self> {
        let stages: BTreeSet<Stage> = stages.into_iter().collect();
        let angles: BTreeSet<Angle> = angles.into_iter().collect();
        let mut counts = BTreeMap::new();

        for (angle, count) in angle_counts {
            if !angles.contains(&angle) {
                tracing::warn!(%angle, %procedure, "dropping count for an angle the requirement does not list");
                continue;
            }
            if count == 0 {
                return Err(CoreError::InvalidInput(format!(
                    "angle count for {angle} in requirement '{procedure}' must be positive"
                )));
            }
            counts.insert(angle, count);
        }

        for angle in &angles {
            counts.entry(*angle).or_insert(DEFAULT_ANGLE_COUNT);
        }

        let total_required = u32::try_from(stages.len())
            .ok()
            .and_then(|stage_count| {
                counts
                    .values()
                    .try_fold(0u32, |sum, count| sum.checked_add(*count))?
                    .checked_mul(stage_count)
            })
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "requirement '{procedure}' needs more photos than can be counted"
                ))
            })?;

        Ok(Self {
            id,
            procedure,
            stages,
            angles,
            angle_counts: counts,
            total_required,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn procedure(&self) -> &NonEmptyText {
        &self.procedure
    }

    pub fn stages(&self) -> &BTreeSet<Stage> {
        &self.stages
    }

    pub fn angles(&self) -> &BTreeSet<Angle> {
        &self.angles
    }

    /// Count per listed angle; covers every angle in [`angles`](Self::angles).
    pub fn angle_counts(&self) -> &BTreeMap<Angle, u32> {
        &self.angle_counts
    }

    /// Photos needed for `angle` in each stage; 0 for angles the requirement does not list.
    pub fn count_for(&self, angle: Angle) -> u32 {
        self.angle_counts.get(&angle).copied().unwrap_or(0)
    }

    /// `|stages| × Σ angle_counts`.
    pub fn total_required(&self) -> u32 {
        self.total_required
    }

    /// Every (stage, angle, count) slot, stages outermost.
    pub fn slots(&self) -> impl Iterator<Item = (Stage, Angle, u32)> + '_ {
        self.stages.iter().flat_map(move |stage| {
            self.angles
                .iter()
                .map(move |angle| (*stage, *angle, self.count_for(*angle)))
        })
    }

    /// The slot a photo's tags fall into, if it matches this requirement at all.
    pub fn slot_for(&self, metadata: &PhotoMetadata) -> Option<(Stage, Angle)> {
        if metadata.procedure.as_ref()? != &self.procedure {
            return None;
        }
        let stage = metadata.stage.filter(|s| self.stages.contains(s))?;
        let angle = metadata.angle.filter(|a| self.angles.contains(a))?;
        Some((stage, angle))
    }
}

/// A named set of requirements with an optional due date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portfolio {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub created_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub requirements: Vec<PortfolioRequirement>,
    pub notes: Option<String>,
}

impl Portfolio {
    /// Photos needed across all requirements; widened so many large requirements cannot
    /// overflow.
    pub fn total_required(&self) -> u64 {
        self.requirements
            .iter()
            .map(|r| u64::from(r.total_required()))
            .sum()
    }

    pub fn requirement(&self, id: Uuid) -> Option<&PortfolioRequirement> {
        self.requirements.iter().find(|r| r.id() == id)
    }

    /// Calendar days until the due date, or `None` without one.
    pub fn days_until_due(&self, calc: &DueStatusCalculator, now: DateTime<Utc>) -> Option<i64> {
        self.due_date.map(|due| calc.days_until_due(due, now))
    }

    pub fn due_status(&self, calc: &DueStatusCalculator, now: DateTime<Utc>) -> DueStatus {
        calc.classify(self.due_date, now)
    }

    pub fn is_overdue(&self, calc: &DueStatusCalculator, now: DateTime<Utc>) -> bool {
        self.due_status(calc, now) == DueStatus::Overdue
    }

    pub fn is_due_soon(&self, calc: &DueStatusCalculator, now: DateTime<Utc>) -> bool {
        self.due_status(calc, now) == DueStatus::DueSoon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn procedure() -> NonEmptyText {
        NonEmptyText::new("Class II composite").unwrap()
    }

    fn two_stage_requirement() -> PortfolioRequirement {
        PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Preparation, Stage::Restoration],
            [Angle::Occlusal, Angle::BuccalFacial],
            [(Angle::Occlusal, 2)],
        )
        .unwrap()
    }

    fn portfolio(due_date: Option<DateTime<Utc>>) -> Portfolio {
        Portfolio {
            id: Uuid::new_v4(),
            name: NonEmptyText::new("Operative dentistry").unwrap(),
            created_date: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
            due_date,
            requirements: vec![two_stage_requirement()],
            notes: None,
        }
    }

    #[test]
    fn total_required_multiplies_stages_by_angle_counts() {
        assert_eq!(two_stage_requirement().total_required(), 6);
    }

    #[test]
    fn partial_counts_are_default_filled() {
        let req = two_stage_requirement();
        let counts = req.angle_counts();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&Angle::Occlusal], 2);
        assert_eq!(counts[&Angle::BuccalFacial], DEFAULT_ANGLE_COUNT);
        assert!(req.angles().iter().all(|a| counts.contains_key(a)));
    }

    #[test]
    fn counts_for_unlisted_angles_are_dropped() {
        let req = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Restoration],
            [Angle::Incisal],
            [(Angle::Distal, 3)],
        )
        .unwrap();

        assert_eq!(req.count_for(Angle::Distal), 0);
        assert_eq!(req.total_required(), 1);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Preparation],
            [Angle::Occlusal],
            [(Angle::Occlusal, 0)],
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("must be positive")));
    }

    #[test]
    fn uncountable_total_is_rejected() {
        let err = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Preparation, Stage::Restoration],
            [Angle::Occlusal, Angle::Distal],
            [(Angle::Occlusal, u32::MAX)],
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("more photos")));
    }

    #[test]
    fn largest_countable_total_is_accepted() {
        let req = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Preparation],
            [Angle::Occlusal],
            [(Angle::Occlusal, u32::MAX)],
        )
        .unwrap();

        assert_eq!(req.total_required(), u32::MAX);

        let mut p = portfolio(None);
        p.requirements = vec![req.clone(), req];
        assert_eq!(p.total_required(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn empty_stages_or_angles_need_nothing() {
        let no_stages = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            Vec::<Stage>::new(),
            [Angle::Occlusal],
            Vec::<(Angle, u32)>::new(),
        )
        .unwrap();
        let no_angles = PortfolioRequirement::new(
            Uuid::new_v4(),
            procedure(),
            [Stage::Preparation],
            Vec::<Angle>::new(),
            Vec::<(Angle, u32)>::new(),
        )
        .unwrap();

        assert_eq!(no_stages.total_required(), 0);
        assert_eq!(no_angles.total_required(), 0);
        assert_eq!(no_stages.slots().count(), 0);
    }

    #[test]
    fn slots_cover_cross_product() {
        let slots: Vec<_> = two_stage_requirement().slots().collect();

        assert_eq!(
            slots,
            vec![
                (Stage::Preparation, Angle::Occlusal, 2),
                (Stage::Preparation, Angle::BuccalFacial, 1),
                (Stage::Restoration, Angle::Occlusal, 2),
                (Stage::Restoration, Angle::BuccalFacial, 1),
            ]
        );
    }

    #[test]
    fn slot_for_requires_procedure_stage_and_angle() {
        let req = two_stage_requirement();
        let matching = PhotoMetadata {
            procedure: Some(procedure()),
            stage: Some(Stage::Restoration),
            angle: Some(Angle::BuccalFacial),
            ..PhotoMetadata::default()
        };
        assert_eq!(
            req.slot_for(&matching),
            Some((Stage::Restoration, Angle::BuccalFacial))
        );

        let wrong_angle = PhotoMetadata {
            angle: Some(Angle::Distal),
            ..matching.clone()
        };
        assert_eq!(req.slot_for(&wrong_angle), None);

        let other_procedure = PhotoMetadata {
            procedure: Some(NonEmptyText::new("Crown").unwrap()),
            ..matching.clone()
        };
        assert_eq!(req.slot_for(&other_procedure), None);

        let untagged_stage = PhotoMetadata {
            stage: None,
            ..matching
        };
        assert_eq!(req.slot_for(&untagged_stage), None);
    }

    #[test]
    fn portfolio_without_due_date_is_never_overdue_or_due_soon() {
        let calc = DueStatusCalculator::default();
        let p = portfolio(None);
        let now = Utc::now();

        assert_eq!(p.days_until_due(&calc, now), None);
        assert!(!p.is_overdue(&calc, now));
        assert!(!p.is_due_soon(&calc, now));
        assert_eq!(p.due_status(&calc, now), DueStatus::NoDueDate);
    }

    #[test]
    fn portfolio_due_status_uses_calendar_days() {
        let calc = DueStatusCalculator::default();
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();

        let in_a_week = portfolio(Some(now + Duration::days(7)));
        assert!(in_a_week.is_due_soon(&calc, now));
        assert!(!in_a_week.is_overdue(&calc, now));

        let yesterday = portfolio(Some(now - Duration::days(1)));
        assert!(yesterday.is_overdue(&calc, now));
        assert_eq!(yesterday.days_until_due(&calc, now), Some(-1));
    }

    #[test]
    fn portfolio_totals_and_lookup() {
        let p = portfolio(None);
        let id = p.requirements[0].id();

        assert_eq!(p.total_required(), 6);
        assert!(p.requirement(id).is_some());
        assert!(p.requirement(Uuid::new_v4()).is_none());
    }
}
