//! Requirement fulfilment engine.
//!
//! For each requirement of a portfolio the engine works out which tagged photos fill which
//! (stage, angle) slot:
//!
//! 1. A photo matches a requirement when its procedure equals the requirement's procedure and
//!    its stage and angle are both listed. Photos missing any of those tags never match.
//! 2. Matching photos are de-duplicated by id and ordered by `(captured_at, id)`.
//! 3. Photos are assigned greedily in that order. Each fills its slot until the slot holds its
//!    required count; later photos for a full slot are surplus and add nothing.
//!
//! Photos are not consumed across requirements. A photo that matches two requirements counts
//! towards both, so fulfilment measures coverage rather than partitioning the photo set.

use crate::portfolio::{Portfolio, PortfolioRequirement};
use crate::photo::TaggedPhoto;
use crate::session::Prefill;
use dentfolio_types::{Angle, NonEmptyText, Stage};
use dentfolio_uuid::{PhotoId, Uuid};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// One (stage, angle) slot of a requirement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotFulfilment {
    pub stage: Stage,
    pub angle: Angle,
    pub required: u32,
    /// Photos counted towards the slot, oldest first; never more than `required`.
    pub assigned: Vec<PhotoId>,
    /// Matching photos that arrived after the slot was full.
    pub surplus: Vec<PhotoId>,
}

impl SlotFulfilment {
    pub fn satisfied(&self) -> u32 {
        self.assigned.len() as u32
    }

    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.satisfied())
    }

    pub fn is_satisfied(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Fulfilment of a single requirement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequirementFulfilment {
    pub requirement_id: Uuid,
    pub procedure: NonEmptyText,
    pub slots: Vec<SlotFulfilment>,
    pub satisfied_count: u32,
    pub total_required: u32,
}

impl RequirementFulfilment {
    /// Share of required photos present. A requirement that needs nothing is complete.
    pub fn completion_fraction(&self) -> f64 {
        if self.total_required == 0 {
            1.0
        } else {
            f64::from(self.satisfied_count) / f64::from(self.total_required)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.satisfied_count >= self.total_required
    }

    pub fn outstanding_slots(&self) -> impl Iterator<Item = &SlotFulfilment> {
        self.slots.iter().filter(|slot| !slot.is_satisfied())
    }

    /// Capture prefills for each slot that still needs photos.
    ///
    /// The tooth number is left for the clinician to choose.
    pub fn outstanding_prefills(&self, portfolio_id: Uuid) -> Vec<Prefill> {
        self.outstanding_slots()
            .map(|slot| Prefill {
                procedure: Some(self.procedure.clone()),
                stage: Some(slot.stage),
                angle: Some(slot.angle),
                tooth_number: None,
                source_portfolio_id: Some(portfolio_id),
            })
            .collect()
    }
}

/// Fulfilment of a whole portfolio.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortfolioFulfilment {
    pub portfolio_id: Uuid,
    /// One entry per requirement, in portfolio order.
    pub requirements: Vec<RequirementFulfilment>,
    pub satisfied_count: u64,
    pub total_required: u64,
}

impl PortfolioFulfilment {
    /// `Σ satisfied / Σ required`; 0 when nothing is required.
    pub fn completion_fraction(&self) -> f64 {
        if self.total_required == 0 {
            0.0
        } else {
            self.satisfied_count as f64 / self.total_required as f64
        }
    }

    pub fn completed_requirements(&self) -> usize {
        self.requirements.iter().filter(|r| r.is_complete()).count()
    }
}

/// Fulfilment operations.
///
/// This is a zero-sized type used for namespacing; all methods are associated functions and
/// pure over their inputs.
pub struct FulfilmentEngine;

impl FulfilmentEngine {
    pub fn evaluate(portfolio: &Portfolio, photos: &[TaggedPhoto]) -> PortfolioFulfilment {
        let requirements: Vec<RequirementFulfilment> = portfolio
            .requirements
            .iter()
            .map(|requirement| Self::evaluate_requirement(requirement, photos))
            .collect();

        let satisfied_count = requirements
            .iter()
            .map(|r| u64::from(r.satisfied_count))
            .sum();
        let total_required = requirements
            .iter()
            .map(|r| u64::from(r.total_required))
            .sum();

        tracing::debug!(
            portfolio = %portfolio.id,
            photos = photos.len(),
            satisfied_count,
            total_required,
            "evaluated portfolio fulfilment"
        );

        PortfolioFulfilment {
            portfolio_id: portfolio.id,
            requirements,
            satisfied_count,
            total_required,
        }
    }

    pub fn evaluate_requirement(
        requirement: &PortfolioRequirement,
        photos: &[TaggedPhoto],
    ) -> RequirementFulfilment {
        let mut slots: Vec<SlotFulfilment> = requirement
            .slots()
            .map(|(stage, angle, required)| SlotFulfilment {
                stage,
                angle,
                required,
                assigned: Vec::new(),
                surplus: Vec::new(),
            })
            .collect();
        let index: BTreeMap<(Stage, Angle), usize> = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| ((slot.stage, slot.angle), i))
            .collect();

        let mut matching: Vec<(&TaggedPhoto, Stage, Angle)> = photos
            .iter()
            .filter_map(|photo| {
                requirement
                    .slot_for(&photo.metadata)
                    .map(|(stage, angle)| (photo, stage, angle))
            })
            .collect();
        matching.sort_by_key(|(photo, _, _)| (photo.captured_at, photo.id));

        let mut seen = HashSet::new();
        for (photo, stage, angle) in matching {
            if !seen.insert(photo.id) {
                tracing::warn!(id = %photo.id, "photo listed more than once; counting it once");
                continue;
            }
            let Some(&i) = index.get(&(stage, angle)) else {
                continue;
            };
            let slot = &mut slots[i];
            if slot.satisfied() < slot.required {
                slot.assigned.push(photo.id);
            } else {
                slot.surplus.push(photo.id);
            }
        }

        let total_required = requirement.total_required();
        let satisfied_count = slots
            .iter()
            .map(SlotFulfilment::satisfied)
            .sum::<u32>()
            .min(total_required);

        RequirementFulfilment {
            requirement_id: requirement.id(),
            procedure: requirement.procedure().clone(),
            slots,
            satisfied_count,
            total_required,
        }
    }
}
