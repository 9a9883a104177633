//! Band files stacked into one multi-band source

use chrono::NaiveDateTime;
use log::debug;

use crate::coordinate::GeoTransform;
use crate::errors::{ExtractError, ExtractResult};
use crate::extractor::RasterWindow;
use crate::utils::string_utils::fill_template;

use super::{EnviSource, ImageSource, SampleType, WindowData};

/// Several single-band sources on one grid, read as one image
///
/// Band order follows the order of the members, so band 1 of the stack is
/// the first member's band.
pub struct BandStack {
    members: Vec<Box<dyn ImageSource>>,
}

impl BandStack {
    /// Stack `members`, which must share srid, size, georeference and sample type
    pub fn new(members: Vec<Box<dyn ImageSource>>) -> ExtractResult<Self> {
        let first = members.first()
            .ok_or_else(|| ExtractError::GenericError("Band stack needs at least one band".to_string()))?;

        let reference = (first.srid(), first.width(), first.height(), first.transform(), first.sample_type());
        for member in members.iter().skip(1) {
            let grid = (member.srid(), member.width(), member.height(), member.transform(), member.sample_type());
            if grid != reference {
                return Err(ExtractError::GenericError(format!(
                    "Band grids differ: {:?} vs {:?}", grid, reference
                )));
            }
        }

        Ok(BandStack { members })
    }

    /// Open one ENVI file per band from a path template
    ///
    /// `{date}` is filled with the acquisition date as `YYYY/MM/DD`,
    /// `{reference}` with the product reference and `{band}` with each band
    /// name in turn.
    pub fn open_envi(template: &str, reference: &str, obstime: &NaiveDateTime, bands: &[String]) -> ExtractResult<Self> {
        let date = obstime.format("%Y/%m/%d").to_string();
        let mut members: Vec<Box<dyn ImageSource>> = Vec::with_capacity(bands.len());

        for band in bands {
            let path = fill_template(template, &[("date", &date), ("reference", reference), ("band", band)]);
            debug!("Opening band {} from {}", band, path);
            members.push(Box::new(EnviSource::open(&path)?));
        }

        Self::new(members)
    }

    fn first(&self) -> &dyn ImageSource {
        // new() guarantees at least one member
        self.members[0].as_ref()
    }
}

impl ImageSource for BandStack {
    fn srid(&self) -> i32 {
        self.first().srid()
    }

    fn transform(&self) -> GeoTransform {
        self.first().transform()
    }

    fn band_count(&self) -> usize {
        self.members.iter().map(|m| m.band_count()).sum()
    }

    fn width(&self) -> u32 {
        self.first().width()
    }

    fn height(&self) -> u32 {
        self.first().height()
    }

    fn sample_type(&self) -> SampleType {
        self.first().sample_type()
    }

    fn nodata(&self) -> Option<f64> {
        self.first().nodata()
    }

    fn read(&mut self, window: &RasterWindow) -> ExtractResult<WindowData> {
        let mut bands = Vec::with_capacity(self.band_count());
        let mut transform = None;

        for member in self.members.iter_mut() {
            let data = member.read(window)?;
            transform.get_or_insert(data.transform);
            bands.extend(data.bands);
        }

        Ok(WindowData {
            window: *window,
            transform: transform.unwrap_or_else(|| self.transform().shifted(window.x, window.y)),
            bands,
        })
    }
}
