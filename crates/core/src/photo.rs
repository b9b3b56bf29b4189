//! Captured photo records.

use crate::tags::PhotoMetadata;
use chrono::{DateTime, Utc};
use dentfolio_types::Rating;
use dentfolio_uuid::{CaptureStamp, PhotoId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque image bytes handed over by the camera collaborator.
///
/// The core never decodes, rotates or compresses the payload. Clones share the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload(Arc<[u8]>);

impl ImagePayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} bytes)", self.0.len())
    }
}

/// One shutter press inside a capture session.
///
/// Identity, payload and capture time are fixed at creation; only the rating and the keep flag
/// change afterwards, and only through the owning session.
#[derive(Clone, Debug)]
pub struct CapturedPhoto {
    id: PhotoId,
    image: ImagePayload,
    rating: Rating,
    keep: bool,
    captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub(crate) fn new(stamp: &CaptureStamp, image: ImagePayload) -> Self {
        Self {
            id: stamp.id(),
            image,
            rating: Rating::UNRATED,
            keep: true,
            captured_at: stamp.timestamp(),
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn keep(&self) -> bool {
        self.keep
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub(crate) fn set_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    pub(crate) fn toggle_keep(&mut self) {
        self.keep = !self.keep;
    }
}

/// A kept photo leaving a finalized session, paired with its final tags.
#[derive(Clone, Debug)]
pub struct FinalizedPhoto {
    pub photo: CapturedPhoto,
    pub metadata: PhotoMetadata,
}

impl FinalizedPhoto {
    /// The view of this photo the fulfilment engine works with.
    pub fn tagged(&self) -> TaggedPhoto {
        TaggedPhoto {
            id: self.photo.id(),
            captured_at: self.photo.captured_at(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A stored photo as seen by the fulfilment engine: identity, capture time and tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedPhoto {
    pub id: PhotoId,
    pub captured_at: DateTime<Utc>,
    pub metadata: PhotoMetadata,
}
