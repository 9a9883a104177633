//! Tests for band stacks

extern crate std;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::NaiveDate;
use std::fs;

use crate::coordinate::GeoTransform;
use crate::errors::ExtractError;
use crate::extractor::{Matrix, RasterWindow};
use crate::source::{BandStack, ImageSource, MemorySource};

fn band(srid: i32, fill: f32) -> Box<dyn ImageSource> {
    let transform = GeoTransform::new(0.0, 30.0, 10.0, -10.0);
    Box::new(MemorySource::new(srid, transform, vec![Matrix::filled(3, 3, fill)]).unwrap())
}

#[test]
fn test_stack_reads_bands_in_order() {
    let mut stack = BandStack::new(vec![band(32631, 1.0), band(32631, 2.0)]).unwrap();
    std::assert_eq!(stack.band_count(), 2);

    let data = stack.read(&RasterWindow::new(0, 0, 2, 2)).unwrap();
    std::assert_eq!(data.bands[0].as_slice(), &[1.0; 4]);
    std::assert_eq!(data.bands[1].as_slice(), &[2.0; 4]);
}

#[test]
fn test_stack_rejects_mismatched_grids() {
    std::assert!(BandStack::new(vec![band(32631, 1.0), band(32632, 2.0)]).is_err());
    std::assert!(BandStack::new(Vec::new()).is_err());
}

#[test]
fn test_open_envi_from_template() {
    let dir = std::env::temp_dir().join(format!("parcelkit_stack_{}", std::process::id()));
    let scene = dir.join("2024/05/01/S1A_TEST");
    fs::create_dir_all(&scene).unwrap();

    for (band, value) in [("VV", 3.0f32), ("VH", 4.0f32)] {
        fs::write(
            scene.join(format!("Gamma0_{}.hdr", band)),
            "ENVI\nsamples = 2\nlines = 2\nbands = 1\ndata type = 4\nbyte order = 0\n\
             map info = {UTM, 1, 1, 500000, 5600000, 10, 10, 31, North}\n",
        ).unwrap();
        let mut data = Vec::new();
        for _ in 0..4 {
            data.write_f32::<LittleEndian>(value).unwrap();
        }
        fs::write(scene.join(format!("Gamma0_{}.img", band)), data).unwrap();
    }

    let template = format!("{}/{{date}}/{{reference}}/Gamma0_{{band}}.img", dir.display());
    let obstime = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
    let bands = vec!["VV".to_string(), "VH".to_string()];

    let mut stack = BandStack::open_envi(&template, "S1A_TEST", &obstime, &bands).unwrap();
    std::assert_eq!(stack.srid(), 32631);
    let data = stack.read(&RasterWindow::full(2, 2)).unwrap();
    std::assert_eq!(data.bands[0].as_slice(), &[3.0; 4]);
    std::assert_eq!(data.bands[1].as_slice(), &[4.0; 4]);

    let missing = vec!["HH".to_string()];
    let result = BandStack::open_envi(&template, "S1A_TEST", &obstime, &missing);
    std::assert!(std::matches!(result, Err(ExtractError::ResourceMissing(_))));

    fs::remove_dir_all(&dir).unwrap();
}
