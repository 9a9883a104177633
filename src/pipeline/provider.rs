//! Locating the image source of a claimed catalog image

use crate::catalog::ImageHandle;
use crate::errors::ExtractResult;
use crate::source::{BandStack, ImageSource};

/// Opens the raster data of a claimed image
pub trait SourceProvider {
    /// Open `bands` of `image` as one multi-band source, in the given order
    fn open(&self, image: &ImageHandle, bands: &[String]) -> ExtractResult<Box<dyn ImageSource>>;
}

/// One ENVI file per band, located through a path template
#[derive(Debug, Clone)]
pub struct EnviTemplateProvider {
    template: String,
}

impl EnviTemplateProvider {
    /// Create a provider for `template`
    ///
    /// See [`BandStack::open_envi`] for the placeholders.
    pub fn new(template: &str) -> Self {
        EnviTemplateProvider {
            template: template.to_string(),
        }
    }
}

impl SourceProvider for EnviTemplateProvider {
    fn open(&self, image: &ImageHandle, bands: &[String]) -> ExtractResult<Box<dyn ImageSource>> {
        let stack = BandStack::open_envi(&self.template, &image.reference, &image.obstime, bands)?;
        Ok(Box::new(stack))
    }
}
