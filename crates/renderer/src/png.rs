//! PNG encoding for RGBA chart images.
//!
//! Charts are mostly flat background with thin lines, so each scanline is
//! written with the PNG "Up" filter, which turns repeated rows into runs of
//! zeros that deflate well.

use std::io::Write;

use crate::error::{RenderError, RenderResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG filter type 2: each byte minus the byte directly above it.
const FILTER_UP: u8 = 2;

/// Create an RGBA PNG (color type 6).
///
/// `text` entries are written as uncompressed `tEXt` chunks
/// (e.g. `("Title", "...")`); keys must be Latin-1 and 1-79 bytes long.
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    text: &[(&str, &str)],
) -> RenderResult<Vec<u8>> {
    if pixels.len() != width * height * 4 {
        return Err(RenderError::Encode(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            width * height * 4,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::with_capacity(pixels.len() / 4);
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type (RGBA)
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    for (key, value) in text {
        if key.is_empty() || key.len() > 79 {
            return Err(RenderError::Encode(format!("invalid tEXt key '{}'", key)));
        }
        let mut data = Vec::with_capacity(key.len() + 1 + value.len());
        data.extend_from_slice(key.as_bytes());
        data.push(0);
        data.extend(value.chars().map(|c| if (c as u32) < 256 { c as u8 } else { b'?' }));
        write_chunk(&mut png, b"tEXt", &data);
    }

    let idat = deflate_scanlines(pixels, width * 4, height)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk: length, type, data, CRC over type+data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate_scanlines(pixels: &[u8], stride: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut filtered = Vec::with_capacity(height * (1 + stride));
    for y in 0..height {
        let row = &pixels[y * stride..(y + 1) * stride];
        filtered.push(FILTER_UP);
        if y == 0 {
            filtered.extend_from_slice(row);
        } else {
            let prev = &pixels[(y - 1) * stride..y * stride];
            filtered.extend(row.iter().zip(prev).map(|(&c, &p)| c.wrapping_sub(p)));
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&filtered)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn chunk_types(png: &[u8]) -> Vec<String> {
        let mut types = Vec::new();
        let mut pos = 8;
        while pos + 8 <= png.len() {
            let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
            types.push(String::from_utf8_lossy(&png[pos + 4..pos + 8]).to_string());
            pos += 12 + len;
        }
        types
    }

    #[test]
    fn test_png_structure() {
        let pixels = vec![255u8; 3 * 2 * 4];
        let png = create_png(&pixels, 3, 2, &[("Title", "t2m")]).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(chunk_types(&png), vec!["IHDR", "tEXt", "IDAT", "IEND"]);
    }

    #[test]
    fn test_up_filter_round_trip() {
        // 2x2: red, green / blue, white
        let pixels = [
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let idat = deflate_scanlines(&pixels, 8, 2).unwrap();
        let mut raw = Vec::new();
        flate2::read::ZlibDecoder::new(&idat[..])
            .read_to_end(&mut raw)
            .unwrap();

        assert_eq!(raw.len(), 2 * 9);
        assert_eq!(raw[0], FILTER_UP);
        assert_eq!(&raw[1..9], &pixels[..8]);
        let second: Vec<u8> = raw[10..18]
            .iter()
            .zip(&pixels[..8])
            .map(|(&d, &p)| d.wrapping_add(p))
            .collect();
        assert_eq!(&second[..], &pixels[8..]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(matches!(
            create_png(&[0u8; 4], 2, 2, &[]),
            Err(RenderError::Encode(_))
        ));
    }
}
