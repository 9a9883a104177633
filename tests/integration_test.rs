//! Integration tests for the extraction workflow

extern crate std;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

// Import crate items
use parcelkit::catalog::NewImage;
use parcelkit::extractor::Matrix;
use parcelkit::mask::RasterMaskEncoder;
use parcelkit::storage::ParcelStore;
use parcelkit::{BoundingBox, CardType, Config, ExtractionMode, ExtractionWorker, GeoTransform, ImageStatus,
                JobCoordinator, RunOutcome};

const REFERENCE: &str = "S1A_IW_GRDH_1SDV_20240501";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("parcelkit_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_for(dir: &Path) -> Config {
    Config::parse(&format!(
        r#"
[database]
path = "{db}"

[source]
template = "{root}/{{date}}/{{reference}}/Gamma0_{{band}}.img"

[extraction]
stats_page_size = 2
"#,
        db = dir.join("catalog.db").display(),
        root = dir.display()
    )).unwrap()
}

fn write_band(dir: &Path, band: &str, values: &[f32]) {
    let scene = dir.join("2024/05/01").join(REFERENCE);
    fs::create_dir_all(&scene).unwrap();
    fs::write(
        scene.join(format!("Gamma0_{}.hdr", band)),
        "ENVI\nsamples = 4\nlines = 4\nbands = 1\nheader offset = 0\ndata type = 4\n\
         interleave = bsq\nbyte order = 0\n\
         map info = {UTM, 1.0, 1.0, 500000.0, 5600040.0, 10.0, 10.0, 31, North, WGS-84}\n\
         data ignore value = 0\n",
    ).unwrap();

    let mut data = Vec::new();
    for v in values {
        data.write_f32::<LittleEndian>(*v).unwrap();
    }
    fs::write(scene.join(format!("Gamma0_{}.img", band)), data).unwrap();
}

fn new_image(reference: &str) -> NewImage {
    NewImage {
        reference: reference.to_string(),
        obstime: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(5, 50, 0).unwrap(),
        sensor: "S1A".to_string(),
        card: CardType::Backscatter,
        footprint: BoundingBox::new(4.0, 50.0, 6.0, 52.0),
        footprint_wkt: Some("POLYGON((4 50,6 50,6 52,4 52,4 50))".to_string()),
    }
}

fn add_parcel(store: &ParcelStore, pid: i64, col: u32, row: u32, mask: Matrix<u8>) {
    let transform = GeoTransform::new(500_000.0, 5_600_040.0, 10.0, -10.0).shifted(col, row);
    let envelope = transform.extent(mask.cols() as u32, mask.rows() as u32);
    let blob = RasterMaskEncoder::new(transform, 32631).with_band(mask).encode().unwrap();
    store.insert_mask(pid, 32631, 10, &envelope, &blob).unwrap();
}

#[test]
fn test_complete_extraction_workflow() {
    init_logging();
    let dir = workspace("workflow");
    let config = config_for(&dir);

    write_band(&dir, "VV", &[
        10.0, 12.0, 30.0, 30.0,
        14.0, 16.0, 30.0,  0.0,
        30.0, 30.0, 30.0, 30.0,
        30.0, 30.0, 30.0, 30.0,
    ]);
    write_band(&dir, "VH", &[
        1.0, 2.0, 5.0, 5.0,
        3.0, 4.0, 5.0, 5.0,
        5.0, 5.0, 5.0, 5.0,
        5.0, 5.0, 5.0, 5.0,
    ]);

    let coordinator = JobCoordinator::open(&config).unwrap();
    let image_id = coordinator.register(&new_image(REFERENCE)).unwrap();

    let parcels = ParcelStore::open(&config).unwrap();
    // Top-left 2x2 block
    add_parcel(&parcels, 1, 0, 0, Matrix::filled(2, 2, 1u8));
    // Its minimum is the nodata pixel at row 1, col 3: dropped
    add_parcel(&parcels, 2, 2, 0, Matrix::filled(2, 2, 1u8));
    // Bottom row, L-shaped selection
    add_parcel(&parcels, 3, 0, 2, Matrix::from_vec(2, 2, vec![1, 0, 1, 1]).unwrap());

    let bands = vec!["VV".to_string(), "VH".to_string()];
    let mut worker = ExtractionWorker::open(&config).unwrap();
    let outcome = worker.run_once(CardType::Backscatter, &bands, ExtractionMode::Statistics).unwrap();

    std::assert_eq!(outcome, RunOutcome::Processed { image_id, status: ImageStatus::Extracted, records: 4 });
    std::assert_eq!(coordinator.get(image_id).unwrap().unwrap().status, ImageStatus::Extracted);

    let conn = Connection::open(dir.join("catalog.db")).unwrap();
    let (count, mean, min, max): (i64, f64, f64, f64) = conn.query_row(
        "SELECT count, mean, min, max FROM results WHERE pid = 1 AND band = 'VVb'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    ).unwrap();
    std::assert_eq!((count, mean, min, max), (4, 13.0, 10.0, 16.0));

    let vh_mean: f64 = conn.query_row(
        "SELECT mean FROM results WHERE pid = 1 AND band = 'VHb'", [], |row| row.get(0),
    ).unwrap();
    std::assert_eq!(vh_mean, 2.5);

    let dropped: i64 = conn.query_row("SELECT COUNT(*) FROM results WHERE pid = 2", [], |row| row.get(0)).unwrap();
    std::assert_eq!(dropped, 0);

    let l_count: i64 = conn.query_row(
        "SELECT count FROM results WHERE pid = 3 AND band = 'VVb'", [], |row| row.get(0),
    ).unwrap();
    std::assert_eq!(l_count, 3);

    std::assert_eq!(worker.run_once(CardType::Backscatter, &bands, ExtractionMode::Statistics).unwrap(),
                    RunOutcome::Idle);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_band_files_end_in_error() {
    init_logging();
    let dir = workspace("missing");
    let config = config_for(&dir);

    let coordinator = JobCoordinator::open(&config).unwrap();
    let image_id = coordinator.register(&new_image("S1B_NOT_DELIVERED")).unwrap();

    let mut worker = ExtractionWorker::open(&config).unwrap();
    let bands = vec!["VV".to_string()];
    worker.run_once(CardType::Backscatter, &bands, ExtractionMode::Statistics).unwrap();

    let status = coordinator.get(image_id).unwrap().unwrap().status;
    match status {
        ImageStatus::Error(reason) => std::assert!(reason.starts_with("missing resource"), "{}", reason),
        other => panic!("unexpected status {}", other),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_concurrent_claims_are_exclusive() {
    init_logging();
    let dir = workspace("claims");
    let config = config_for(&dir);

    let coordinator = JobCoordinator::open(&config).unwrap();
    let image_id = coordinator.register(&new_image(REFERENCE)).unwrap();

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers).map(|_| {
        let config = config.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let coordinator = JobCoordinator::open(&config).unwrap();
            let everywhere = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
            barrier.wait();
            coordinator.claim(CardType::Backscatter, &everywhere, &config.selection.time_range()).unwrap()
        })
    }).collect();

    let claims: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = claims.iter().flatten().collect();

    std::assert_eq!(winners.len(), 1);
    std::assert_eq!(winners[0].id, image_id);
    std::assert_eq!(coordinator.get(image_id).unwrap().unwrap().status, ImageStatus::InProgress);

    fs::remove_dir_all(&dir).unwrap();
}
