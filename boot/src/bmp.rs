//! Bitmap Decoding Module
//!
//! Parses the BITMAPFILEHEADER/BITMAPINFOHEADER pair of an uncompressed
//! 24-bit bottom-up bitmap. Every offset and length is validated once in
//! [`decode`]; the returned [`BitmapDescriptor`] only hands out slices that
//! are already known to be in range.

/// BITMAPFILEHEADER size
pub const FILE_HEADER_SIZE: usize = 14;

/// Smallest info header we accept (BITMAPINFOHEADER)
pub const INFO_HEADER_SIZE: usize = 40;

/// Combined fixed header size
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// "BM"
pub const SIGNATURE: [u8; 2] = *b"BM";

pub const BYTES_PER_PIXEL: usize = 3;

const SUPPORTED_BITS_PER_PIXEL: u16 = 24;
const BI_RGB: u32 = 0;

// Field offsets from the start of the file
const OFFSET_PIXEL_DATA: usize = 10;
const OFFSET_INFO_SIZE: usize = 14;
const OFFSET_WIDTH: usize = 18;
const OFFSET_HEIGHT: usize = 22;
const OFFSET_BIT_COUNT: usize = 28;
const OFFSET_COMPRESSION: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{len} bytes is shorter than the {needed} byte bitmap headers")]
    TooShort { len: usize, needed: usize },
    #[error("missing BM signature")]
    BadSignature,
    #[error(
        "unsupported bitmap: {bits_per_pixel} bpp, compression {compression}, \
         {info_size} byte info header"
    )]
    UnsupportedFormat {
        bits_per_pixel: u16,
        compression: u32,
        info_size: u32,
    },
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("pixel data at offset {offset} does not fit in {len} bytes")]
    TruncatedPixelData { offset: u32, len: usize },
}

/// Validated view over the pixel rows of a bitmap file
#[derive(Debug, Clone, Copy)]
pub struct BitmapDescriptor<'a> {
    // Exactly `row_stride * height` bytes, bottom row first
    pixels: &'a [u8],
    width: usize,
    height: usize,
    bits_per_pixel: u16,
    pixel_data_offset: usize,
    row_stride: usize,
}

impl<'a> BitmapDescriptor<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    pub fn pixel_data_offset(&self) -> usize {
        self.pixel_data_offset
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Pixel bytes (B, G, R triples, no padding) of file row `row`,
    /// counted from the bottom of the image
    pub fn file_row(&self, row: usize) -> Option<&'a [u8]> {
        let start = row.checked_mul(self.row_stride)?;
        let end = start.checked_add(self.width * BYTES_PER_PIXEL)?;
        self.pixels.get(start..end)
    }

    /// Pixel rows in screen order, top row first
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let visible = self.width * BYTES_PER_PIXEL;
        self.pixels
            .chunks_exact(self.row_stride)
            .rev()
            .map(move |row| &row[..visible])
    }
}

/// Bytes per row, padded to a 4-byte boundary
pub fn row_stride(width: usize) -> Option<usize> {
    let bytes = width.checked_mul(BYTES_PER_PIXEL)?;
    Some(bytes.checked_add(3)? / 4 * 4)
}

/// Decode and validate the headers of `bytes`
pub fn decode(bytes: &[u8]) -> Result<BitmapDescriptor<'_>, DecodeError> {
    let len = bytes.len();
    if len < HEADER_SIZE {
        return Err(DecodeError::TooShort { len, needed: HEADER_SIZE });
    }

    if bytes[..2] != SIGNATURE {
        return Err(DecodeError::BadSignature);
    }

    let info_size = read_u32(bytes, OFFSET_INFO_SIZE);
    let bits_per_pixel = read_u16(bytes, OFFSET_BIT_COUNT);
    let compression = read_u32(bytes, OFFSET_COMPRESSION);

    if (info_size as usize) < INFO_HEADER_SIZE
        || bits_per_pixel != SUPPORTED_BITS_PER_PIXEL
        || compression != BI_RGB
    {
        return Err(DecodeError::UnsupportedFormat {
            bits_per_pixel,
            compression,
            info_size,
        });
    }

    let header_size = FILE_HEADER_SIZE.saturating_add(info_size as usize);
    if len < header_size {
        return Err(DecodeError::TooShort { len, needed: header_size });
    }

    // Negative height means top-down rows, which we do not support
    let width = read_i32(bytes, OFFSET_WIDTH);
    let height = read_i32(bytes, OFFSET_HEIGHT);
    if width <= 0 || height <= 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    let (width, height) = (width as usize, height as usize);

    let raw_offset = read_u32(bytes, OFFSET_PIXEL_DATA);
    let truncated = DecodeError::TruncatedPixelData { offset: raw_offset, len };
    let pixel_data_offset = raw_offset as usize;
    if pixel_data_offset < header_size || pixel_data_offset >= len {
        return Err(truncated);
    }

    let row_stride = row_stride(width).ok_or(truncated)?;
    let end = row_stride
        .checked_mul(height)
        .and_then(|size| size.checked_add(pixel_data_offset))
        .ok_or(truncated)?;
    if end > len {
        return Err(truncated);
    }

    Ok(BitmapDescriptor {
        pixels: &bytes[pixel_data_offset..end],
        width,
        height,
        bits_per_pixel,
        pixel_data_offset,
        row_stride,
    })
}

// Callers have checked `offset + N <= bytes.len()`
fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    read_u32(bytes, offset) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{put_i32, put_u16, put_u32, synth_bmp};

    fn gradient(x: usize, y: usize) -> [u8; 3] {
        [x as u8, y as u8, (x + y) as u8]
    }

    #[test]
    fn row_stride_pads_to_four_bytes() {
        let cases = [
            (1, 4),
            (2, 8),
            (3, 12),
            (4, 12),
            (5, 16),
            (100, 300),
            (4096, 12288),
        ];
        for (width, expected) in cases {
            assert_eq!(row_stride(width), Some(expected), "width {width}");

            let bytes = synth_bmp(width, 1, gradient);
            let image = decode(&bytes).unwrap();
            assert_eq!(image.row_stride(), expected, "decoded width {width}");
        }
    }

    #[test]
    fn decodes_header_fields() {
        let bytes = synth_bmp(5, 3, gradient);
        let image = decode(&bytes).unwrap();

        assert_eq!(image.width(), 5);
        assert_eq!(image.height(), 3);
        assert_eq!(image.bits_per_pixel(), 24);
        assert_eq!(image.pixel_data_offset(), HEADER_SIZE);
        assert_eq!(bytes.len(), HEADER_SIZE + 16 * 3);
    }

    #[test]
    fn rows_come_out_top_down() {
        let bytes = synth_bmp(3, 4, gradient);
        let image = decode(&bytes).unwrap();

        let rows: Vec<&[u8]> = image.rows().collect();
        assert_eq!(rows.len(), 4);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 9);
            for x in 0..3 {
                assert_eq!(&row[x * 3..x * 3 + 3], &gradient(x, y));
            }
        }

        // File row 0 is the bottom of the picture
        assert_eq!(image.file_row(0), Some(rows[3]));
        assert_eq!(image.file_row(4), None);
    }

    #[test]
    fn rejects_short_buffers() {
        let bytes = synth_bmp(2, 2, gradient);
        assert!(matches!(
            decode(&bytes[..HEADER_SIZE - 1]),
            Err(DecodeError::TooShort { len: 53, needed: HEADER_SIZE })
        ));
        assert!(matches!(decode(&[]), Err(DecodeError::TooShort { len: 0, .. })));
    }

    #[test]
    fn rejects_info_header_larger_than_file() {
        let mut bytes = synth_bmp(2, 2, gradient);
        put_u32(&mut bytes, 14, 0xFFFF_FFF0);
        assert!(matches!(decode(&bytes), Err(DecodeError::TooShort { .. })));
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = synth_bmp(2, 2, gradient);
        bytes[0] = b'M';
        bytes[1] = b'B';
        assert!(matches!(decode(&bytes), Err(DecodeError::BadSignature)));
    }

    #[test]
    fn rejects_other_bit_depths() {
        for bits in [1u16, 4, 8, 16, 32] {
            let mut bytes = synth_bmp(2, 2, gradient);
            put_u16(&mut bytes, 28, bits);
            assert!(
                matches!(
                    decode(&bytes),
                    Err(DecodeError::UnsupportedFormat { bits_per_pixel, .. })
                        if bits_per_pixel == bits
                ),
                "{bits} bpp"
            );
        }
    }

    #[test]
    fn rejects_compression_and_core_headers() {
        let mut rle = synth_bmp(2, 2, gradient);
        put_u32(&mut rle, 30, 1);
        assert!(matches!(decode(&rle), Err(DecodeError::UnsupportedFormat { compression: 1, .. })));

        let mut core = synth_bmp(2, 2, gradient);
        put_u32(&mut core, 14, 12);
        assert!(matches!(decode(&core), Err(DecodeError::UnsupportedFormat { info_size: 12, .. })));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let mut top_down = synth_bmp(2, 2, gradient);
        put_i32(&mut top_down, 22, -2);
        assert!(matches!(
            decode(&top_down),
            Err(DecodeError::InvalidDimensions { height: -2, .. })
        ));

        let mut empty = synth_bmp(2, 2, gradient);
        put_i32(&mut empty, 18, 0);
        assert!(matches!(decode(&empty), Err(DecodeError::InvalidDimensions { width: 0, .. })));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let bytes = synth_bmp(3, 3, gradient);
        let short = &bytes[..bytes.len() - 1];
        assert!(matches!(decode(short), Err(DecodeError::TruncatedPixelData { .. })));
    }

    #[test]
    fn rejects_pixel_offset_outside_file() {
        let mut inside_header = synth_bmp(2, 2, gradient);
        put_u32(&mut inside_header, 10, 20);
        assert!(matches!(
            decode(&inside_header),
            Err(DecodeError::TruncatedPixelData { offset: 20, .. })
        ));

        let mut past_end = synth_bmp(2, 2, gradient);
        let len = past_end.len() as u32;
        put_u32(&mut past_end, 10, len);
        assert!(matches!(decode(&past_end), Err(DecodeError::TruncatedPixelData { .. })));
    }

    #[test]
    fn adversarial_headers_never_panic() {
        let mut bytes = synth_bmp(4, 4, gradient);
        put_i32(&mut bytes, 18, i32::MAX);
        put_i32(&mut bytes, 22, i32::MAX);
        assert!(matches!(decode(&bytes), Err(DecodeError::TruncatedPixelData { .. })));

        put_u32(&mut bytes, 10, u32::MAX);
        assert!(matches!(decode(&bytes), Err(DecodeError::TruncatedPixelData { .. })));

        // Every prefix of a valid file is rejected without reading past it
        let valid = synth_bmp(5, 3, gradient);
        for cut in 0..valid.len() {
            assert!(decode(&valid[..cut]).is_err(), "prefix of {cut} bytes");
        }
        assert!(decode(&valid).is_ok());
    }
}
