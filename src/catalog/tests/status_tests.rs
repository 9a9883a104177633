//! Tests for image statuses and card types

extern crate std;

use crate::catalog::{CardType, ImageStatus};

#[test]
fn test_status_db_values() {
    for status in [ImageStatus::Ingested, ImageStatus::InProgress, ImageStatus::Extracted, ImageStatus::Final] {
        std::assert_eq!(ImageStatus::from_db(&status.as_db()), status);
    }

    let failed = ImageStatus::error("no parcels");
    std::assert_eq!(failed.as_db(), "error: no parcels");
    std::assert_eq!(ImageStatus::from_db("error: no parcels"), failed);
}

#[test]
fn test_legacy_free_form_status_is_an_error() {
    std::assert_eq!(ImageStatus::from_db("!S3 VV.img"), ImageStatus::error("!S3 VV.img"));
    std::assert!(ImageStatus::from_db("Rio error").is_terminal());
}

#[test]
fn test_transition_table() {
    use ImageStatus::*;

    std::assert!(Ingested.can_transition_to(&InProgress));
    std::assert!(InProgress.can_transition_to(&Extracted));
    std::assert!(InProgress.can_transition_to(&Final));
    std::assert!(InProgress.can_transition_to(&ImageStatus::error("decode error")));
    std::assert!(Extracted.can_transition_to(&Ingested));

    std::assert!(!Ingested.can_transition_to(&Extracted));
    std::assert!(!InProgress.can_transition_to(&Ingested));
    std::assert!(!ImageStatus::error("x").can_transition_to(&Ingested));
    std::assert!(!Final.can_transition_to(&InProgress));
}

#[test]
fn test_card_codes_and_labels() {
    std::assert_eq!("bs".parse::<CardType>().unwrap(), CardType::Backscatter);
    std::assert_eq!("C6".parse::<CardType>().unwrap(), CardType::Coherence6);
    std::assert!("xx".parse::<CardType>().is_err());

    std::assert_eq!(CardType::Backscatter.band_label("VV"), "VVb");
    std::assert_eq!(CardType::Coherence6.band_label("VV"), "VVc");
    std::assert_eq!(CardType::SurfaceReflectance.band_label("B04"), "B04");
}

#[test]
fn test_default_band_sets() {
    std::assert_eq!(CardType::Backscatter.default_bands(None).unwrap(), vec!["VV", "VH"]);
    std::assert_eq!(CardType::SurfaceReflectance.default_bands(Some(20)).unwrap(), vec!["B05", "B11"]);
    std::assert_eq!(CardType::SurfaceReflectance.default_bands(Some(-1)).unwrap(), vec!["SCL"]);
    std::assert!(CardType::SurfaceReflectance.default_bands(Some(60)).is_err());
}
