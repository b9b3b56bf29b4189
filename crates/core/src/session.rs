//! Capture session state machine.
//!
//! A session moves through three stages:
//!
//! ```text
//! Setup --start_shooting--> Shooting --finish_shooting (>= 1 photo)--> Review
//!   ^                          ^                                          |
//!   |                          +-- prefill with procedure (from Setup)    |
//!   +------------------------ reset / cancel / finalize -----------------+
//! ```
//!
//! The stage change for every event is decided by one pure function,
//! [`CaptureStage::next`]. [`CaptureSession::apply`] runs it and only then applies the event's
//! data effects, so a rejected event leaves the session untouched. UI collaborators observe
//! the session through its read accessors; the core holds no UI primitives.
//!
//! Mutators take `&mut self`, which gives the single-writer discipline the session relies on.
//! Hosts sharing a session across threads should serialise access through one owner.

use crate::error::{CoreError, CoreResult};
use crate::photo::{CapturedPhoto, FinalizedPhoto, ImagePayload};
use crate::tags::{PhotoMetadata, TagSelection};
use dentfolio_types::{Angle, NonEmptyText, Rating, Stage, ToothNumber};
use dentfolio_uuid::{CaptureStamp, PhotoId, Uuid};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Receives a pulse each time a photo is captured.
///
/// Calls are fire-and-forget: implementations must return promptly and must not panic. Nothing
/// about capture correctness depends on them.
pub trait HapticFeedback: Send + Sync {
    fn photo_captured(&self);
}

/// Haptics collaborator that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn photo_captured(&self) {}
}

/// Stage of a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CaptureStage {
    Setup,
    Shooting,
    Review,
}

impl fmt::Display for CaptureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureStage::Setup => "setup",
            CaptureStage::Shooting => "shooting",
            CaptureStage::Review => "review",
        };
        f.write_str(name)
    }
}

/// Tags supplied by the navigation collaborator when capture is launched.
///
/// Launching from an outstanding requirement fills procedure, stage and angle; the tooth
/// number may still be missing and is then chosen manually.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prefill {
    pub procedure: Option<NonEmptyText>,
    pub stage: Option<Stage>,
    pub angle: Option<Angle>,
    pub tooth_number: Option<ToothNumber>,
    pub source_portfolio_id: Option<Uuid>,
}

impl Prefill {
    pub fn is_from_requirement(&self) -> bool {
        self.procedure.is_some()
    }
}

/// Everything that can happen to a capture session.
#[derive(Clone, Debug)]
pub enum CaptureEvent {
    Prefill(Prefill),
    StartShooting,
    AddPhoto(ImagePayload),
    RemovePhoto(usize),
    ToggleKeep(PhotoId),
    SetRating(PhotoId, Rating),
    FinishShooting,
    Reset,
}

impl CaptureEvent {
    pub fn operation(&self) -> &'static str {
        match self {
            CaptureEvent::Prefill(_) => "prefill tags",
            CaptureEvent::StartShooting => "start shooting",
            CaptureEvent::AddPhoto(_) => "add a photo",
            CaptureEvent::RemovePhoto(_) => "remove a photo",
            CaptureEvent::ToggleKeep(_) => "toggle keep",
            CaptureEvent::SetRating(..) => "set a rating",
            CaptureEvent::FinishShooting => "finish shooting",
            CaptureEvent::Reset => "reset",
        }
    }
}

impl CaptureStage {
    /// Transition function of the session state machine.
    ///
    /// `photo_count` is the number of records currently held; it decides whether prefill is
    /// still allowed and whether finishing the shoot can reach review.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStateTransition`] when `event` is not allowed in `self`.
    pub fn next(self, event: &CaptureEvent, photo_count: usize) -> CoreResult<CaptureStage> {
        use CaptureStage::*;

        let next = match (self, event) {
            (Setup, CaptureEvent::Prefill(prefill)) if photo_count == 0 => {
                if prefill.is_from_requirement() {
                    Shooting
                } else {
                    Setup
                }
            }
            (Setup, CaptureEvent::StartShooting) => Shooting,
            (Shooting, CaptureEvent::AddPhoto(_)) => Shooting,
            (Shooting | Review, CaptureEvent::RemovePhoto(_)) => self,
            (_, CaptureEvent::ToggleKeep(_) | CaptureEvent::SetRating(..)) => self,
            (Shooting, CaptureEvent::FinishShooting) if photo_count > 0 => Review,
            (Shooting, CaptureEvent::FinishShooting) => Shooting,
            (_, CaptureEvent::Reset) => Setup,
            (stage, event) => {
                return Err(CoreError::InvalidStateTransition {
                    operation: event.operation(),
                    stage,
                })
            }
        };

        Ok(next)
    }
}

/// Result of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: CaptureStage,
    pub to: CaptureStage,
    /// Identity of the record created by an `AddPhoto` event.
    pub captured: Option<PhotoId>,
}

/// How a session ended, as read by the navigation and persistence collaborators.
#[derive(Clone, Debug)]
pub enum SessionOutcome {
    /// Kept photos, each paired with the final tags, in capture order.
    Finalized {
        photos: Vec<FinalizedPhoto>,
        source_portfolio_id: Option<Uuid>,
        from_requirement: bool,
    },
    Cancelled {
        discarded: usize,
    },
}

/// One continuous capture interaction, from setup through review.
pub struct CaptureSession {
    stage: CaptureStage,
    tags: TagSelection,
    photos: Vec<CapturedPhoto>,
    is_from_requirement: bool,
    source_portfolio_id: Option<Uuid>,
    last_stamp: Option<CaptureStamp>,
    haptics: Arc<dyn HapticFeedback>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("stage", &self.stage)
            .field("tags", &self.tags)
            .field("photos", &self.photos)
            .field("is_from_requirement", &self.is_from_requirement)
            .field("source_portfolio_id", &self.source_portfolio_id)
            .finish_non_exhaustive()
    }
}

impl CaptureSession {
    /// A fresh session in `Setup` with no haptics collaborator.
    pub fn new() -> Self {
        Self {
            stage: CaptureStage::Setup,
            tags: TagSelection::default(),
            photos: Vec::new(),
            is_from_requirement: false,
            source_portfolio_id: None,
            last_stamp: None,
            haptics: Arc::new(NoHaptics),
        }
    }

    /// A fresh session with `prefill` applied.
    ///
    /// Starts in `Shooting` when the prefill carries a procedure, otherwise in `Setup`.
    pub fn prefilled(prefill: Prefill) -> Self {
        let mut session = Self::new();
        session.stage = CaptureStage::Setup
            .next(&CaptureEvent::Prefill(prefill.clone()), 0)
            .unwrap_or(CaptureStage::Setup);
        session.apply_prefill(prefill);
        session
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn stage(&self) -> CaptureStage {
        self.stage
    }

    pub fn tags(&self) -> &TagSelection {
        &self.tags
    }

    /// Manual tag editing; allowed in every stage.
    pub fn tags_mut(&mut self) -> &mut TagSelection {
        &mut self.tags
    }

    /// All records in capture order.
    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn is_from_requirement(&self) -> bool {
        self.is_from_requirement
    }

    pub fn source_portfolio_id(&self) -> Option<Uuid> {
        self.source_portfolio_id
    }

    /// Records still marked to keep, in capture order.
    pub fn kept_photos(&self) -> Vec<&CapturedPhoto> {
        self.photos.iter().filter(|photo| photo.keep()).collect()
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStateTransition`] if the current stage forbids the event.
    /// The session is left unchanged in that case.
    pub fn apply(&mut self, event: CaptureEvent) -> CoreResult<Transition> {
        let from = self.stage;
        let to = from.next(&event, self.photos.len())?;
        let mut captured = None;

        match event {
            CaptureEvent::Prefill(prefill) => self.apply_prefill(prefill),
            CaptureEvent::StartShooting | CaptureEvent::FinishShooting => {}
            CaptureEvent::AddPhoto(image) => captured = Some(self.capture(image)),
            CaptureEvent::RemovePhoto(index) => {
                if index < self.photos.len() {
                    self.photos.remove(index);
                } else {
                    tracing::debug!(index, count = self.photos.len(), "remove_photo: no such index");
                }
            }
            CaptureEvent::ToggleKeep(id) => match self.photo_mut(id) {
                Some(photo) => photo.toggle_keep(),
                None => tracing::debug!(%id, "toggle_keep: no such photo"),
            },
            CaptureEvent::SetRating(id, rating) => match self.photo_mut(id) {
                Some(photo) => photo.set_rating(rating),
                None => tracing::debug!(%id, "set_rating: no such photo"),
            },
            CaptureEvent::Reset => self.clear(),
        }

        if from != to {
            tracing::debug!(%from, %to, "capture stage transition");
        }
        self.stage = to;

        Ok(Transition { from, to, captured })
    }

    /// Set tags from a capture launch.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidStateTransition`] once the session has left `Setup` or
    /// holds any photo.
    pub fn prefill(&mut self, prefill: Prefill) -> CoreResult<CaptureStage> {
        self.apply(CaptureEvent::Prefill(prefill)).map(|t| t.to)
    }

    pub fn start_shooting(&mut self) -> CoreResult<()> {
        self.apply(CaptureEvent::StartShooting).map(|_| ())
    }

    /// Record one shutter press and return the new photo's identity.
    pub fn add_photo(&mut self, image: ImagePayload) -> CoreResult<PhotoId> {
        let transition = self.apply(CaptureEvent::AddPhoto(image))?;
        transition.captured.ok_or(CoreError::InvalidStateTransition {
            operation: "add a photo",
            stage: transition.to,
        })
    }

    /// Remove the record at `index`; an index past the end is ignored.
    pub fn remove_photo(&mut self, index: usize) -> CoreResult<()> {
        self.apply(CaptureEvent::RemovePhoto(index)).map(|_| ())
    }

    /// Flip the keep flag of the photo with `id`; an unknown id is ignored.
    pub fn toggle_keep(&mut self, id: PhotoId) -> CoreResult<()> {
        self.apply(CaptureEvent::ToggleKeep(id)).map(|_| ())
    }

    /// Set the rating of the photo with `id`; an unknown id is ignored.
    pub fn set_rating(&mut self, id: PhotoId, rating: Rating) -> CoreResult<()> {
        self.apply(CaptureEvent::SetRating(id, rating)).map(|_| ())
    }

    /// Move to review if anything was captured; with no photos the session stays in
    /// `Shooting`.
    pub fn finish_shooting(&mut self) -> CoreResult<CaptureStage> {
        self.apply(CaptureEvent::FinishShooting).map(|t| t.to)
    }

    /// Clear tags and records and return to `Setup`. Always succeeds.
    pub fn reset(&mut self) {
        self.clear();
        self.stage = CaptureStage::Setup;
    }

    /// Hand the kept photos over with their final tags, then reset.
    ///
    /// # Errors
    ///
    /// Only allowed in `Review`; any other stage returns
    /// [`CoreError::InvalidStateTransition`].
    pub fn finalize(&mut self) -> CoreResult<SessionOutcome> {
        if self.stage != CaptureStage::Review {
            return Err(CoreError::InvalidStateTransition {
                operation: "finalize",
                stage: self.stage,
            });
        }

        let metadata = PhotoMetadata::from(&self.tags);
        let source_portfolio_id = self.source_portfolio_id;
        let from_requirement = self.is_from_requirement;
        let photos: Vec<FinalizedPhoto> = std::mem::take(&mut self.photos)
            .into_iter()
            .filter(CapturedPhoto::keep)
            .map(|photo| FinalizedPhoto {
                photo,
                metadata: metadata.clone(),
            })
            .collect();

        tracing::info!(
            kept = photos.len(),
            summary = %metadata.display_summary(),
            "capture session finalized"
        );
        self.reset();

        Ok(SessionOutcome::Finalized {
            photos,
            source_portfolio_id,
            from_requirement,
        })
    }

    /// Discard everything and return to `Setup`.
    pub fn cancel(&mut self) -> SessionOutcome {
        let discarded = self.photos.len();
        self.reset();
        tracing::info!(discarded, "capture session cancelled");
        SessionOutcome::Cancelled { discarded }
    }

    fn apply_prefill(&mut self, prefill: Prefill) {
        self.is_from_requirement = prefill.is_from_requirement();
        self.source_portfolio_id = prefill.source_portfolio_id;
        if let Some(procedure) = prefill.procedure {
            self.tags.procedure = Some(procedure);
        }
        if let Some(stage) = prefill.stage {
            self.tags.stage = Some(stage);
        }
        if let Some(angle) = prefill.angle {
            self.tags.angle = Some(angle);
        }
        if let Some(tooth_number) = prefill.tooth_number {
            self.tags.tooth_number = Some(tooth_number);
        }
    }

    fn capture(&mut self, image: ImagePayload) -> PhotoId {
        let stamp = CaptureStamp::generate(self.last_stamp.as_ref());
        let photo = CapturedPhoto::new(&stamp, image);
        let id = photo.id();
        self.photos.push(photo);
        self.last_stamp = Some(stamp);
        self.haptics.photo_captured();
        id
    }

    fn photo_mut(&mut self, id: PhotoId) -> Option<&mut CapturedPhoto> {
        self.photos.iter_mut().find(|photo| photo.id() == id)
    }

    fn clear(&mut self) {
        self.tags.clear();
        self.photos.clear();
        self.is_from_requirement = false;
        self.source_portfolio_id = None;
        self.last_stamp = None;
    }
}
