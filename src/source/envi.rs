//! ENVI raw band files
//!
//! Radar CARD products ship every polarisation as an ENVI `.img` file with
//! a plain-text `.hdr` next to it. Samples are band-sequential, so a window
//! is read one row at a time with a seek per row and only the window ever
//! sits in memory.

use log::{debug, warn};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::coordinate::GeoTransform;
use crate::errors::{ExtractError, ExtractResult};
use crate::extractor::{Matrix, RasterWindow};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;

use super::{check_window, ImageSource, SampleType, WindowData};

/// Parsed ENVI header
#[derive(Debug, Clone, PartialEq)]
pub struct EnviHeader {
    pub samples: u32,
    pub lines: u32,
    pub bands: u32,
    pub header_offset: u64,
    pub sample_type: SampleType,
    pub byte_order: ByteOrder,
    pub transform: GeoTransform,
    pub srid: i32,
    pub nodata: Option<f64>,
}

impl EnviHeader {
    /// Parse header text
    pub fn parse(text: &str) -> ExtractResult<Self> {
        if !text.trim_start().starts_with("ENVI") {
            return Err(invalid("missing ENVI signature"));
        }
        let fields = collect_fields(text);

        let samples = required_number::<u32>(&fields, "samples")?;
        let lines = required_number::<u32>(&fields, "lines")?;
        let bands = required_number::<u32>(&fields, "bands")?;
        let header_offset = optional_number::<u64>(&fields, "header offset")?.unwrap_or(0);

        let type_code = required_number::<u32>(&fields, "data type")?;
        let sample_type = SampleType::from_envi(type_code)
            .ok_or_else(|| ExtractError::UnsupportedSampleType(format!("ENVI data type {}", type_code)))?;

        let order_code = optional_number::<u8>(&fields, "byte order")?.unwrap_or(0);
        let byte_order = ByteOrder::from_envi(order_code)
            .ok_or_else(|| invalid(&format!("byte order {}", order_code)))?;

        let interleave = fields.get("interleave").map(|s| s.to_lowercase()).unwrap_or_else(|| "bsq".to_string());
        if interleave != "bsq" && bands > 1 {
            return Err(invalid(&format!("interleave {} is not supported", interleave)));
        }

        let map_info = fields.get("map info").ok_or_else(|| invalid("missing map info"))?;
        let (transform, srid) = parse_map_info(map_info)?;

        let nodata = optional_number::<f64>(&fields, "data ignore value")?;

        Ok(EnviHeader {
            samples,
            lines,
            bands,
            header_offset,
            sample_type,
            byte_order,
            transform,
            srid,
            nodata,
        })
    }
}

fn invalid(detail: &str) -> ExtractError {
    ExtractError::GenericError(format!("Invalid ENVI header: {}", detail))
}

/// Split `key = value` pairs; braced values may span several lines
fn collect_fields(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut pending: Option<(String, String)> = None;

    for line in text.lines().skip(1) {
        if let Some((key, mut value)) = pending.take() {
            value.push(' ');
            value.push_str(line.trim());
            if line.contains('}') {
                fields.insert(key, value);
            } else {
                pending = Some((key, value));
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else { continue };
        let key = key.trim().to_lowercase();
        let value = value.trim().to_string();
        if value.starts_with('{') && !value.contains('}') {
            pending = Some((key, value));
        } else {
            fields.insert(key, value);
        }
    }

    fields
}

fn optional_number<T: std::str::FromStr>(fields: &HashMap<String, String>, key: &str) -> ExtractResult<Option<T>> {
    match fields.get(key) {
        Some(value) => value.trim().parse::<T>()
            .map(Some)
            .map_err(|_| invalid(&format!("{} = {}", key, value))),
        None => Ok(None),
    }
}

fn required_number<T: std::str::FromStr>(fields: &HashMap<String, String>, key: &str) -> ExtractResult<T> {
    optional_number(fields, key)?.ok_or_else(|| invalid(&format!("missing {}", key)))
}

/// Parse `{proj, ref x, ref y, easting, northing, dx, dy[, zone, hemisphere], ...}`
fn parse_map_info(value: &str) -> ExtractResult<(GeoTransform, i32)> {
    let inner = value.trim().trim_start_matches('{').trim_end_matches('}');
    let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
    if parts.len() < 7 {
        return Err(invalid(&format!("map info {}", value)));
    }

    let number = |i: usize| parts[i].parse::<f64>().map_err(|_| invalid(&format!("map info field {}", parts[i])));
    let ref_x = number(1)?;
    let ref_y = number(2)?;
    let easting = number(3)?;
    let northing = number(4)?;
    let dx = number(5)?;
    let dy = number(6)?;

    // Reference pixel is 1-based and refers to the pixel's upper-left corner
    let transform = GeoTransform::new(
        easting - (ref_x - 1.0) * dx,
        northing + (ref_y - 1.0) * dy,
        dx,
        -dy,
    );

    let projection = parts[0].to_lowercase();
    let srid = if projection == "utm" && parts.len() >= 9 {
        let zone = parts[7].parse::<i32>().map_err(|_| invalid(&format!("UTM zone {}", parts[7])))?;
        if parts[8].to_lowercase().starts_with('s') { 32700 + zone } else { 32600 + zone }
    } else if projection.starts_with("geographic") {
        4326
    } else {
        warn!("No EPSG code for map projection '{}'", parts[0]);
        0
    };

    Ok((transform, srid))
}

/// One ENVI raster with seek-based windowed reads
pub struct EnviSource {
    header: EnviHeader,
    reader: Box<dyn SeekableReader>,
    handler: Box<dyn ByteOrderHandler>,
}

impl EnviSource {
    /// Open `image_path` and its `.hdr` sibling
    pub fn open<P: AsRef<Path>>(image_path: P) -> ExtractResult<Self> {
        let image_path = image_path.as_ref();
        let header_path = image_path.with_extension("hdr");

        for path in [image_path, header_path.as_path()] {
            if !path.exists() {
                return Err(ExtractError::ResourceMissing(path.display().to_string()));
            }
        }

        let header = EnviHeader::parse(&fs::read_to_string(&header_path)?)?;
        debug!("Opened {} ({}x{}, {} band(s), {:?})", image_path.display(),
               header.samples, header.lines, header.bands, header.sample_type);
        let reader = BufReader::new(File::open(image_path)?);
        Ok(Self::from_parts(header, Box::new(reader)))
    }

    /// Use an already parsed header with any seekable reader
    pub fn from_parts(header: EnviHeader, reader: Box<dyn SeekableReader>) -> Self {
        let handler = header.byte_order.create_handler();
        EnviSource { header, reader, handler }
    }

    /// Parsed header
    pub fn header(&self) -> &EnviHeader {
        &self.header
    }

    fn decode_row(&self, bytes: &[u8], out: &mut Vec<f32>) -> ExtractResult<()> {
        let mut cursor = Cursor::new(bytes);
        let reader: &mut dyn SeekableReader = &mut cursor;
        let count = bytes.len() / self.header.sample_type.size();
        for _ in 0..count {
            let value = match self.header.sample_type {
                SampleType::U8 => {
                    let mut byte = [0u8; 1];
                    reader.read_exact(&mut byte)?;
                    byte[0] as f32
                }
                SampleType::I16 => self.handler.read_i16(reader)? as f32,
                SampleType::U16 => self.handler.read_u16(reader)? as f32,
                SampleType::F32 => self.handler.read_f32(reader)?,
            };
            out.push(value);
        }
        Ok(())
    }
}

impl ImageSource for EnviSource {
    fn srid(&self) -> i32 {
        self.header.srid
    }

    fn transform(&self) -> GeoTransform {
        self.header.transform
    }

    fn band_count(&self) -> usize {
        self.header.bands as usize
    }

    fn width(&self) -> u32 {
        self.header.samples
    }

    fn height(&self) -> u32 {
        self.header.lines
    }

    fn sample_type(&self) -> SampleType {
        self.header.sample_type
    }

    fn nodata(&self) -> Option<f64> {
        self.header.nodata
    }

    fn read(&mut self, window: &RasterWindow) -> ExtractResult<WindowData> {
        check_window(window, self.header.samples, self.header.lines)?;

        let sample_size = self.header.sample_type.size() as u64;
        let samples = self.header.samples as u64;
        let lines = self.header.lines as u64;
        let mut row_bytes = vec![0u8; window.width as usize * sample_size as usize];

        let mut bands = Vec::with_capacity(self.header.bands as usize);
        for band in 0..self.header.bands as u64 {
            let mut values = Vec::with_capacity(window.area() as usize);
            for row in window.y as u64..window.end_y() as u64 {
                let offset = self.header.header_offset +
                    ((band * lines + row) * samples + window.x as u64) * sample_size;
                self.reader.seek(SeekFrom::Start(offset))?;
                self.reader.read_exact(&mut row_bytes)?;
                self.decode_row(&row_bytes, &mut values)?;
            }
            let matrix = Matrix::from_vec(window.height as usize, window.width as usize, values)
                .ok_or_else(|| ExtractError::GenericError("Window sample count mismatch".to_string()))?;
            bands.push(matrix);
        }

        Ok(WindowData {
            window: *window,
            transform: self.header.transform.shifted(window.x, window.y),
            bands,
        })
    }
}
