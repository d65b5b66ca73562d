//! Tests for the serialization boundary: snapshot records and collection
//! reconstruction, including the JSON shape an external store sees.

use chrono::{TimeZone, Utc};
use fotag_model::collection::ImageCollectionModel;
use fotag_model::error::Error;
use fotag_model::image::ImageModel;
use fotag_model::snapshot::ImageRecord;

fn populated_collection() -> ImageCollectionModel {
    let collection = ImageCollectionModel::new();
    let d1 = Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap();
    let d2 = Utc.with_ymd_and_hms(2024, 2, 9, 19, 15, 0).unwrap();
    let a = ImageModel::new("/images/a.jpg", d1, "harbour", 4).expect("valid image");
    let b = ImageModel::new("/images/b.png", d2, "", 0).expect("valid image");
    collection.add_image_model(&a);
    collection.add_image_model(&b);
    collection
}

#[test]
fn snapshot_preserves_order_and_fields() {
    let collection = populated_collection();
    let records = collection.snapshot();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path.to_str(), Some("/images/a.jpg"));
    assert_eq!(records[0].caption, "harbour");
    assert_eq!(records[0].rating, 4);
    assert_eq!(records[1].path.to_str(), Some("/images/b.png"));
    assert_eq!(records[1].caption, "");
    assert_eq!(records[1].rating, 0);
}

#[test]
fn from_records_rebuilds_models_with_fresh_relays() {
    let records = populated_collection().snapshot();
    let restored = ImageCollectionModel::from_records(records.clone()).expect("valid records");

    assert_eq!(restored.snapshot(), records);

    // Every restored image carries exactly its own relay subscription.
    for image in restored.image_models() {
        assert_eq!(image.listener_count(), 1);
    }
}

#[test]
fn restored_collection_is_fully_live() {
    let restored =
        ImageCollectionModel::from_records(populated_collection().snapshot()).expect("valid");
    let images = restored.image_models();

    let before = images[0].modification_date();
    images[0].set_caption("renamed after restore");
    assert_eq!(images[0].caption(), "renamed after restore");
    assert!(images[0].modification_date() > before);
}

#[test]
fn corrupt_rating_in_store_is_rejected() {
    let record = ImageRecord {
        path: "/images/a.jpg".into(),
        modification_date: Utc::now(),
        caption: String::new(),
        rating: 7,
    };
    let err = ImageCollectionModel::from_records(vec![record]).expect_err("rating 7 is invalid");
    assert_eq!(err, Error::InvalidRating(7));
}

#[test]
fn records_use_the_original_storage_field_names() {
    let collection = populated_collection();
    let json = serde_json::to_value(collection.snapshot()).expect("serialize records");

    let first = &json[0];
    assert!(first.get("path").is_some());
    assert!(first.get("modificationDate").is_some());
    assert!(first.get("caption").is_some());
    assert!(first.get("rating").is_some());
}

#[test]
fn records_round_trip_through_json() {
    let records = populated_collection().snapshot();
    let json = serde_json::to_string(&records).expect("serialize records");
    let back: Vec<ImageRecord> = serde_json::from_str(&json).expect("deserialize records");
    assert_eq!(back, records);
}
