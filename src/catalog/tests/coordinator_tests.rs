//! Tests for the job coordinator

extern crate std;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::catalog::{CardType, ImageStatus, JobCoordinator, NewImage, TimeRange};
use crate::coordinate::BoundingBox;
use crate::errors::ExtractError;

fn coordinator() -> JobCoordinator {
    let conn = Connection::open_in_memory().unwrap();
    JobCoordinator::with_connection(conn, "dias_catalogue").unwrap()
}

fn image(reference: &str, day: u32, card: CardType, footprint: BoundingBox) -> NewImage {
    NewImage {
        reference: reference.to_string(),
        obstime: NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(6, 0, 0).unwrap(),
        sensor: "S1A".to_string(),
        card,
        footprint,
        footprint_wkt: None,
    }
}

fn everywhere() -> BoundingBox {
    BoundingBox::new(-180.0, -90.0, 180.0, 90.0)
}

fn footprint() -> BoundingBox {
    BoundingBox::new(4.0, 50.0, 6.0, 52.0)
}

#[test]
fn test_claim_oldest_first() {
    let coordinator = coordinator();
    coordinator.register(&image("late", 20, CardType::Backscatter, footprint())).unwrap();
    let early = coordinator.register(&image("early", 3, CardType::Backscatter, footprint())).unwrap();

    let handle = coordinator.claim(CardType::Backscatter, &everywhere(), &TimeRange::unbounded()).unwrap().unwrap();
    std::assert_eq!(handle.id, early);
    std::assert_eq!(handle.reference, "early");

    let stored = coordinator.get(early).unwrap().unwrap();
    std::assert_eq!(stored.status, ImageStatus::InProgress);

    let next = coordinator.claim(CardType::Backscatter, &everywhere(), &TimeRange::unbounded()).unwrap().unwrap();
    std::assert_eq!(next.reference, "late");

    std::assert!(coordinator.claim(CardType::Backscatter, &everywhere(), &TimeRange::unbounded()).unwrap().is_none());
}

#[test]
fn test_claim_respects_filters() {
    let coordinator = coordinator();
    coordinator.register(&image("coherence", 1, CardType::Coherence6, footprint())).unwrap();
    coordinator.register(&image("far-away", 2, CardType::Backscatter, BoundingBox::new(20.0, 60.0, 22.0, 62.0))).unwrap();
    coordinator.register(&image("too-late", 28, CardType::Backscatter, footprint())).unwrap();
    coordinator.register(&image("wanted", 10, CardType::Backscatter, footprint())).unwrap();

    let aoi = BoundingBox::new(5.0, 51.0, 5.5, 51.5);
    let range = TimeRange::new(
        Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()),
        Some(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(0, 0, 0).unwrap()),
    );

    let handle = coordinator.claim(CardType::Backscatter, &aoi, &range).unwrap().unwrap();
    std::assert_eq!(handle.reference, "wanted");
    std::assert!(coordinator.claim(CardType::Backscatter, &aoi, &range).unwrap().is_none());
}

#[test]
fn test_complete_requires_expected_prior_status() {
    let coordinator = coordinator();
    let id = coordinator.register(&image("one", 1, CardType::Backscatter, footprint())).unwrap();

    // Not claimed yet: still ingested
    std::assert!(!coordinator.complete(id, ImageStatus::Extracted, ImageStatus::InProgress).unwrap());

    coordinator.claim(CardType::Backscatter, &everywhere(), &TimeRange::unbounded()).unwrap().unwrap();
    std::assert!(coordinator.complete(id, ImageStatus::Extracted, ImageStatus::InProgress).unwrap());
    // Second completion loses
    std::assert!(!coordinator.complete(id, ImageStatus::error("late"), ImageStatus::InProgress).unwrap());

    std::assert_eq!(coordinator.get(id).unwrap().unwrap().status, ImageStatus::Extracted);
}

#[test]
fn test_invalid_transition_is_rejected() {
    let coordinator = coordinator();
    let id = coordinator.register(&image("one", 1, CardType::Backscatter, footprint())).unwrap();

    let result = coordinator.complete(id, ImageStatus::Final, ImageStatus::Ingested);
    std::assert!(matches!(result, Err(ExtractError::InvalidTransition { .. })));
}

#[test]
fn test_error_status_round_trips_through_catalog() {
    let coordinator = coordinator();
    let id = coordinator.register(&image("one", 1, CardType::Backscatter, footprint())).unwrap();
    coordinator.claim(CardType::Backscatter, &everywhere(), &TimeRange::unbounded()).unwrap().unwrap();

    std::assert!(coordinator.complete(id, ImageStatus::error("missing resource VV.img"), ImageStatus::InProgress).unwrap());
    std::assert_eq!(coordinator.get(id).unwrap().unwrap().status, ImageStatus::error("missing resource VV.img"));
}

#[test]
fn test_status_counts_and_reset() {
    let coordinator = coordinator();
    let a = coordinator.register(&image("a", 1, CardType::SurfaceReflectance, footprint())).unwrap();
    coordinator.register(&image("b", 2, CardType::SurfaceReflectance, footprint())).unwrap();

    coordinator.claim(CardType::SurfaceReflectance, &everywhere(), &TimeRange::unbounded()).unwrap().unwrap();
    coordinator.complete(a, ImageStatus::Extracted, ImageStatus::InProgress).unwrap();

    let counts = coordinator.status_counts(CardType::SurfaceReflectance, &everywhere(), &TimeRange::unbounded()).unwrap();
    std::assert_eq!(counts, vec![(ImageStatus::Extracted, 1), (ImageStatus::Ingested, 1)]);

    let reset = coordinator.reset_extracted(CardType::SurfaceReflectance, &everywhere(), &TimeRange::unbounded()).unwrap();
    std::assert_eq!(reset, 1);
    std::assert_eq!(coordinator.get(a).unwrap().unwrap().status, ImageStatus::Ingested);
}
