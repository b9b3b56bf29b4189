//! # Dentfolio Core
//!
//! Core logic for documenting dental procedures with tagged photographs.
//!
//! This crate contains the two parts of the system that hold real state and aggregation logic:
//! - the capture session state machine ([`CaptureSession`]), which accumulates tag selections
//!   and captured photos through setup, shooting and review
//! - the requirement fulfilment engine ([`FulfilmentEngine`]), which measures how far a
//!   portfolio's photo requirements are covered by the tagged photos taken so far
//!
//! together with the data model they share and calendar-day due-date classification.
//!
//! **No I/O**: camera access, rendering, persistence and notification scheduling are external
//! collaborators. They exchange plain values with this crate; nothing here blocks, suspends or
//! touches the filesystem.

pub mod calendar;
pub mod config;
pub mod constants;
pub mod due;
pub mod error;
pub mod fulfilment;
pub mod photo;
pub mod portfolio;
pub mod session;
pub mod tags;

pub use calendar::Calendar;
pub use config::{utc_offset_from_env_value, CoreConfig};
pub use due::{DueStatus, DueStatusCalculator};
pub use error::{CoreError, CoreResult};
pub use fulfilment::{FulfilmentEngine, PortfolioFulfilment, RequirementFulfilment, SlotFulfilment};
pub use photo::{CapturedPhoto, FinalizedPhoto, ImagePayload, TaggedPhoto};
pub use portfolio::{Portfolio, PortfolioRequirement};
pub use session::{
    CaptureEvent, CaptureSession, CaptureStage, HapticFeedback, NoHaptics, Prefill,
    SessionOutcome, Transition,
};
pub use tags::{PhotoMetadata, TagSelection, ToothEntry};

pub use dentfolio_types::{Angle, NonEmptyText, Rating, Stage, ToothNumber, TypesError};
pub use dentfolio_uuid::{CaptureStamp, PhotoId, Uuid, UuidError};
