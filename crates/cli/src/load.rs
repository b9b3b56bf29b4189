//! Loading portfolio files and photo logs from disk into core values.

use anyhow::Context;
use dentfolio_core::{Portfolio, PortfolioRequirement, PhotoMetadata, TaggedPhoto};
use dentfolio_wire::{PhotoLog, PhotoRecordData, PortfolioData, PortfolioFile};
use std::path::Path;

pub fn load_portfolio(path: &Path) -> anyhow::Result<Portfolio> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read portfolio file {}", path.display()))?;
    let data = PortfolioFile::parse(&text)
        .with_context(|| format!("failed to parse portfolio file {}", path.display()))?;
    portfolio_from_data(data)
}

pub fn load_photos(path: &Path) -> anyhow::Result<Vec<TaggedPhoto>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read photo log {}", path.display()))?;
    let records = PhotoLog::parse(&text)
        .with_context(|| format!("failed to parse photo log {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded photo log");
    Ok(records.into_iter().map(tagged_from_record).collect())
}

fn portfolio_from_data(data: PortfolioData) -> anyhow::Result<Portfolio> {
    let requirements = data
        .requirements
        .into_iter()
        .map(|req| {
            PortfolioRequirement::new(
                req.requirement_id,
                req.procedure,
                req.stages,
                req.angles,
                req.angle_counts,
            )
            .with_context(|| format!("invalid requirement {}", req.requirement_id))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Portfolio {
        id: data.portfolio_id,
        name: data.name,
        created_date: data.created_date,
        due_date: data.due_date,
        requirements,
        notes: data.notes,
    })
}

fn tagged_from_record(record: PhotoRecordData) -> TaggedPhoto {
    TaggedPhoto {
        id: record.photo_id,
        captured_at: record.captured_at,
        metadata: PhotoMetadata {
            procedure: record.procedure,
            tooth_number: record.tooth_number,
            tooth_date: record.tooth_date,
            stage: record.stage,
            angle: record.angle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentfolio_core::{Angle, Stage};
    use std::fs;
    use tempfile::TempDir;

    const PORTFOLIO: &str = r#"portfolio_id: 550e8400-e29b-41d4-a716-446655440000
name: Operative dentistry
created_date: "2026-09-01T09:00:00Z"
due_date: "2026-10-20T17:00:00Z"
requirements:
  - requirement_id: 4f8c2a1d-9e3b-4a7c-8f1e-6b0d2c5a9f12
    procedure: Class II composite
    stages: [Preparation, Restoration]
    angles: [Occlusal, Buccal/Facial]
    angle_counts:
      Occlusal: 2
"#;

    const PHOTOS: &str = r#"photos:
  - photo_id: 550e8400e29b41d4a716446655440000
    captured_at: "2026-10-01T10:00:00Z"
    procedure: Class II composite
    tooth_number: 14
    stage: Preparation
    angle: Occlusal
"#;

    #[test]
    fn loads_portfolio_with_default_filled_counts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portfolio.yaml");
        fs::write(&path, PORTFOLIO).unwrap();

        let portfolio = load_portfolio(&path).unwrap();

        assert_eq!(portfolio.name.as_str(), "Operative dentistry");
        assert_eq!(portfolio.total_required(), 6);
        let req = &portfolio.requirements[0];
        assert_eq!(req.count_for(Angle::BuccalFacial), 1);
        assert!(req.stages().contains(&Stage::Restoration));
    }

    #[test]
    fn zero_angle_count_fails_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portfolio.yaml");
        fs::write(&path, PORTFOLIO.replace("Occlusal: 2", "Occlusal: 0")).unwrap();

        let err = load_portfolio(&path).unwrap_err();
        assert!(format!("{err:#}").contains("must be positive"));
    }

    #[test]
    fn loads_photo_log_as_tagged_photos() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photos.yaml");
        fs::write(&path, PHOTOS).unwrap();

        let photos = load_photos(&path).unwrap();

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].metadata.stage, Some(Stage::Preparation));
        assert!(photos[0].metadata.tooth_date.is_none());
    }

    #[test]
    fn missing_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.yaml");

        let err = load_photos(&path).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
    }
}
