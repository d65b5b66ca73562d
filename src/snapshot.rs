//! Serialization boundary: plain snapshot records for an external store.
//!
//! The store (browser local storage in the original app, a JSON file, a
//! database row) is out of scope here; the crate only guarantees that a
//! collection flattens to ordered [`ImageRecord`]s and reconstructs from
//! them with fresh listener plumbing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::ImageCollectionModel;
use crate::error::Error;
use crate::image::ImageModel;

/// One stored image. Field names match the original gallery's storage
/// records, so existing stores keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub path: PathBuf,
    pub modification_date: DateTime<Utc>,
    pub caption: String,
    pub rating: u8,
}

impl ImageRecord {
    pub fn from_model(image: &ImageModel) -> Self {
        Self {
            path: image.path().to_path_buf(),
            modification_date: image.modification_date(),
            caption: image.caption(),
            rating: image.rating(),
        }
    }

    /// Rebuild a live model from this record. A tampered or corrupt store
    /// can hold an out-of-range rating, which is rejected here.
    pub fn into_model(self) -> Result<ImageModel, Error> {
        ImageModel::new(self.path, self.modification_date, self.caption, self.rating)
    }
}

impl ImageCollectionModel {
    /// Flatten the collection into plain records, insertion order preserved.
    pub fn snapshot(&self) -> Vec<ImageRecord> {
        self.image_models()
            .iter()
            .map(ImageRecord::from_model)
            .collect()
    }

    /// Reconstruct a collection from stored records. Every image gets a
    /// fresh relay subscription; nothing from the previous life survives.
    pub fn from_records(
        records: impl IntoIterator<Item = ImageRecord>,
    ) -> Result<ImageCollectionModel, Error> {
        let collection = ImageCollectionModel::new();
        for record in records {
            let image = record.into_model()?;
            collection.add_image_model(&image);
        }
        Ok(collection)
    }
}
