//! Portfolio file wire model and translation helpers.
//!
//! Responsibilities:
//! - Define the public domain-level carriers ([`PortfolioData`], [`RequirementData`])
//! - Define a strict wire model for serialisation/deserialisation
//! - Translate between the two, validating identifiers and names
//!
//! Angle counts are carried through as written; default-filling and positivity are enforced
//! when the core builds its requirement from the carrier.

use crate::{parse_strict, WireError, WireResult};
use chrono::{DateTime, Utc};
use dentfolio_types::{Angle, NonEmptyText, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for a portfolio file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortfolioData {
    pub portfolio_id: Uuid,
    pub name: NonEmptyText,
    pub created_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Requirements in file order.
    pub requirements: Vec<RequirementData>,
}

/// Domain-level carrier for one requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequirementData {
    pub requirement_id: Uuid,
    pub procedure: NonEmptyText,
    pub stages: Vec<Stage>,
    pub angles: Vec<Angle>,
    pub angle_counts: BTreeMap<Angle, u32>,
}

// ============================================================================
// Public PortfolioFile operations
// ============================================================================

/// Portfolio file operations.
///
/// This is a zero-sized type used for namespacing; all methods are associated functions.
pub struct PortfolioFile;

impl PortfolioFile {
    /// Parse a portfolio from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not match the wire schema (unknown keys, wrong types, unknown
    ///   stage/angle labels); the message names the failing field path,
    /// - an identifier is not a valid UUID,
    /// - the portfolio name or a procedure is blank.
    pub fn parse(yaml_text: &str) -> WireResult<PortfolioData> {
        let wire: PortfolioWire = parse_strict(yaml_text, "Portfolio")?;
        wire_to_domain(wire)
    }

    /// Render a portfolio as YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if serialisation fails.
    pub fn render(data: &PortfolioData) -> WireResult<String> {
        serde_yaml::to_string(&domain_to_wire(data))
            .map_err(|e| WireError::Translation(format!("Failed to serialize portfolio: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PortfolioWire {
    portfolio_id: String,
    name: String,
    created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default)]
    requirements: Vec<RequirementWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct RequirementWire {
    requirement_id: String,
    procedure: String,
    #[serde(default)]
    stages: Vec<Stage>,
    #[serde(default)]
    angles: Vec<Angle>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    angle_counts: BTreeMap<Angle, u32>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn parse_uuid(value: &str, field: &str) -> WireResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| WireError::InvalidUuid(format!("Invalid UUID in {field}: {value}")))
}

fn parse_text(value: &str, field: &str) -> WireResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| WireError::InvalidInput(format!("{field}: {e}")))
}

fn wire_to_domain(wire: PortfolioWire) -> WireResult<PortfolioData> {
    let requirements = wire
        .requirements
        .into_iter()
        .enumerate()
        .map(|(i, req)| {
            Ok(RequirementData {
                requirement_id: parse_uuid(
                    &req.requirement_id,
                    &format!("requirements[{i}].requirement_id"),
                )?,
                procedure: parse_text(&req.procedure, &format!("requirements[{i}].procedure"))?,
                stages: req.stages,
                angles: req.angles,
                angle_counts: req.angle_counts,
            })
        })
        .collect::<WireResult<Vec<_>>>()?;

    Ok(PortfolioData {
        portfolio_id: parse_uuid(&wire.portfolio_id, "portfolio_id")?,
        name: parse_text(&wire.name, "name")?,
        created_date: wire.created_date,
        due_date: wire.due_date,
        notes: wire.notes.filter(|n| !n.trim().is_empty()),
        requirements,
    })
}

fn domain_to_wire(data: &PortfolioData) -> PortfolioWire {
    PortfolioWire {
        portfolio_id: data.portfolio_id.to_string(),
        name: data.name.to_string(),
        created_date: data.created_date,
        due_date: data.due_date,
        notes: data.notes.clone(),
        requirements: data
            .requirements
            .iter()
            .map(|req| RequirementWire {
                requirement_id: req.requirement_id.to_string(),
                procedure: req.procedure.to_string(),
                stages: req.stages.clone(),
                angles: req.angles.clone(),
                angle_counts: req.angle_counts.clone(),
            })
            .collect(),
    }
}
