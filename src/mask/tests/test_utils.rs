use byteorder::{LittleEndian, WriteBytesExt};

/// Creates a hand-written little-endian mask header
pub fn create_header(band_count: u16, width: u16, height: u16) -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.write_u8(1).unwrap();                                // NDR
    buffer.write_u16::<LittleEndian>(0).unwrap();               // Version
    buffer.write_u16::<LittleEndian>(band_count).unwrap();      // Band count
    buffer.write_f64::<LittleEndian>(10.0).unwrap();            // Scale X
    buffer.write_f64::<LittleEndian>(-10.0).unwrap();           // Scale Y
    buffer.write_f64::<LittleEndian>(500_000.0).unwrap();       // Origin X
    buffer.write_f64::<LittleEndian>(5_600_000.0).unwrap();     // Origin Y
    buffer.write_f64::<LittleEndian>(0.0).unwrap();             // Skew X
    buffer.write_f64::<LittleEndian>(0.0).unwrap();             // Skew Y
    buffer.write_i32::<LittleEndian>(32631).unwrap();           // SRID
    buffer.write_u16::<LittleEndian>(width).unwrap();           // Width
    buffer.write_u16::<LittleEndian>(height).unwrap();          // Height

    buffer
}

/// Appends one band segment with the given flag byte
pub fn append_segment(buffer: &mut Vec<u8>, flag: u8, samples: &[u8]) {
    buffer.push(flag);
    buffer.push(0); // nodata
    buffer.extend_from_slice(samples);
}
