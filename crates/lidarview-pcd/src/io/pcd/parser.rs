use std::path::Path;

use crate::color::Color;
use crate::pointcloud::PointCloud;

use super::header::{DataEncoding, FieldKind, PcdField, PcdHeader};
use super::{lzf, PcdError};

/// Attribute arrays gathered by a payload decoder before assembly.
struct RawAttributes {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    num_points: usize,
}

/// Parse a complete PCD byte buffer into a [`PointCloud`].
///
/// `name` is carried through to the returned cloud unchanged. `base_color`
/// seeds the hue and saturation used when an `intensity` field is mapped to
/// per-point colors; its own lightness is ignored.
///
/// Numeric parse failures in ascii payloads are fatal
/// ([`PcdError::MalformedAsciiValue`]); a payload shorter than the declared
/// point count requires is fatal ([`PcdError::TruncatedPayload`]). No partial
/// point set is ever returned.
pub fn parse_pcd_bytes(data: &[u8], name: &str, base_color: Color) -> Result<PointCloud, PcdError> {
    let header = PcdHeader::parse(data)?;

    log::debug!(
        "pcd '{}': {:?} encoding, {} declared points, fields [{}]",
        name,
        header.encoding,
        header.num_points,
        header.field_names.join(" ")
    );

    let payload = &data[header.header_len..];

    let raw = match header.encoding {
        DataEncoding::Ascii => decode_ascii(payload, &header)?,
        DataEncoding::Binary => decode_binary(payload, &header, base_color)?,
        DataEncoding::BinaryCompressed => decode_binary_compressed(payload, &header)?,
    };

    Ok(PointCloud::new(
        name,
        raw.num_points,
        raw.positions,
        (!raw.colors.is_empty()).then_some(raw.colors),
        (!raw.normals.is_empty()).then_some(raw.normals),
    ))
}

/// Read a PCD file from disk.
///
/// Validates the `.pcd` extension, then parses the file contents with the
/// file stem as the cloud name.
pub fn read_pcd(path: impl AsRef<Path>, base_color: Color) -> Result<PointCloud, PcdError> {
    let path = path.as_ref();

    let Some(file_ext) = path.extension() else {
        return Err(PcdError::InvalidFileExtension("".into()));
    };

    if file_ext != "pcd" {
        return Err(PcdError::InvalidFileExtension(
            file_ext.to_string_lossy().to_string(),
        ));
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let data = std::fs::read(path)?;
    parse_pcd_bytes(&data, &name, base_color)
}

fn xyz_fields(header: &PcdHeader) -> Option<[&PcdField; 3]> {
    match (header.field("x"), header.field("y"), header.field("z")) {
        (Some(x), Some(y), Some(z)) => Some([x, y, z]),
        _ => None,
    }
}

fn normal_fields(header: &PcdHeader) -> Option<[&PcdField; 3]> {
    match (
        header.field("normal_x"),
        header.field("normal_y"),
        header.field("normal_z"),
    ) {
        (Some(nx), Some(ny), Some(nz)) => Some([nx, ny, nz]),
        _ => None,
    }
}

fn ascii_value<T: std::str::FromStr>(
    tokens: &[&str],
    column: usize,
    field: &str,
    line: usize,
) -> Result<T, PcdError> {
    tokens
        .get(column)
        .and_then(|token| token.parse::<T>().ok())
        .ok_or_else(|| PcdError::MalformedAsciiValue {
            line,
            field: field.to_string(),
        })
}

fn decode_ascii(payload: &[u8], header: &PcdHeader) -> Result<RawAttributes, PcdError> {
    let text = String::from_utf8_lossy(payload);

    let xyz = xyz_fields(header);
    let rgb = header.field("rgb");
    let normal = normal_fields(header);

    let mut positions = Vec::with_capacity(header.num_points);
    let mut colors = Vec::new();
    let mut normals = Vec::new();
    let mut num_points = 0usize;

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let line_number = line_index + 1;

        if let Some([x, y, z]) = xyz {
            positions.push([
                ascii_value::<f32>(&tokens, x.offset, "x", line_number)?,
                ascii_value::<f32>(&tokens, y.offset, "y", line_number)?,
                ascii_value::<f32>(&tokens, z.offset, "z", line_number)?,
            ]);
        }

        if let Some(rgb) = rgb {
            let packed = ascii_value::<f64>(&tokens, rgb.offset, "rgb", line_number)? as u32;
            colors.push([
                ((packed >> 16) & 0xff) as f32 / 255.0,
                ((packed >> 8) & 0xff) as f32 / 255.0,
                (packed & 0xff) as f32 / 255.0,
            ]);
        }

        if let Some([nx, ny, nz]) = normal {
            normals.push([
                ascii_value::<f32>(&tokens, nx.offset, "normal_x", line_number)?,
                ascii_value::<f32>(&tokens, ny.offset, "normal_y", line_number)?,
                ascii_value::<f32>(&tokens, nz.offset, "normal_z", line_number)?,
            ]);
        }

        num_points += 1;
    }

    Ok(RawAttributes {
        positions,
        colors,
        normals,
        num_points,
    })
}

fn decode_binary(
    payload: &[u8],
    header: &PcdHeader,
    base_color: Color,
) -> Result<RawAttributes, PcdError> {
    let expected = header
        .num_points
        .checked_mul(header.row_size)
        .ok_or_else(|| PcdError::MalformedHeader("payload size overflow".to_string()))?;
    if payload.len() < expected {
        return Err(PcdError::TruncatedPayload {
            expected,
            actual: payload.len(),
        });
    }

    let xyz = xyz_fields(header);
    let intensity = header.field("intensity");
    let rgb = header.field("rgb");
    let normal = normal_fields(header);
    let base_hsl = base_color.to_hsl();

    let mut positions = Vec::with_capacity(header.num_points);
    let mut colors = Vec::new();
    let mut normals = Vec::new();

    for i in 0..header.num_points {
        let row = i * header.row_size;

        if let Some([x, y, z]) = xyz {
            positions.push([
                read_f32(payload, row + x.offset)?,
                read_f32(payload, row + y.offset)?,
                read_f32(payload, row + z.offset)?,
            ]);
        }

        if let Some(field) = intensity {
            let value = read_intensity(payload, row + field.offset, field)?;
            let color = Color::from_hsl(base_hsl.h, base_hsl.s, value / 192.0 + 0.25);
            colors.push([color.r, color.g, color.b]);
        } else if let Some(field) = rgb {
            // stored blue-green-red, extracted in reverse
            colors.push([
                read_u8(payload, row + field.offset + 2)? as f32 / 255.0,
                read_u8(payload, row + field.offset + 1)? as f32 / 255.0,
                read_u8(payload, row + field.offset)? as f32 / 255.0,
            ]);
        }

        if let Some([nx, ny, nz]) = normal {
            normals.push([
                read_f32(payload, row + nx.offset)?,
                read_f32(payload, row + ny.offset)?,
                read_f32(payload, row + nz.offset)?,
            ]);
        }
    }

    Ok(RawAttributes {
        positions,
        colors,
        normals,
        num_points: header.num_points,
    })
}

fn decode_binary_compressed(payload: &[u8], header: &PcdHeader) -> Result<RawAttributes, PcdError> {
    let compressed_len = read_u32(payload, 0)? as usize;
    let decompressed_len = read_u32(payload, 4)? as usize;

    let compressed = payload
        .get(8..8 + compressed_len)
        .ok_or(PcdError::TruncatedPayload {
            expected: 8 + compressed_len,
            actual: payload.len(),
        })?;

    let data = lzf::decompress(compressed, decompressed_len)?;

    let expected = header
        .num_points
        .checked_mul(header.row_size)
        .ok_or_else(|| PcdError::MalformedHeader("payload size overflow".to_string()))?;
    if data.len() < expected {
        return Err(PcdError::TruncatedPayload {
            expected,
            actual: data.len(),
        });
    }

    let xyz = xyz_fields(header);
    let rgb = header.field("rgb");
    let normal = normal_fields(header);

    let mut positions = Vec::with_capacity(header.num_points);
    let mut colors = Vec::new();
    let mut normals = Vec::new();

    // Field-major layout: all values of one field are contiguous, starting
    // at num_points * offset. Offsets scale with the point count here, not
    // with the record size as in the uncompressed binary encoding.
    let base = |field: &PcdField| header.num_points * field.offset;

    for i in 0..header.num_points {
        if let Some([x, y, z]) = xyz {
            positions.push([
                read_f32(&data, base(x) + x.size * i)?,
                read_f32(&data, base(y) + y.size * i)?,
                read_f32(&data, base(z) + z.size * i)?,
            ]);
        }

        if let Some(field) = rgb {
            let at = base(field) + field.size * i;
            colors.push([
                read_u8(&data, at)? as f32 / 255.0,
                read_u8(&data, at + 1)? as f32 / 255.0,
                read_u8(&data, at + 2)? as f32 / 255.0,
            ]);
        }

        if let Some([nx, ny, nz]) = normal {
            normals.push([
                read_f32(&data, base(nx) + nx.size * i)?,
                read_f32(&data, base(ny) + ny.size * i)?,
                read_f32(&data, base(nz) + nz.size * i)?,
            ]);
        }
    }

    Ok(RawAttributes {
        positions,
        colors,
        normals,
        num_points: header.num_points,
    })
}

fn read_intensity(buf: &[u8], offset: usize, field: &PcdField) -> Result<f32, PcdError> {
    Ok(match (field.kind, field.size) {
        (FieldKind::Unsigned, 1) => read_u8(buf, offset)? as f32,
        (FieldKind::Unsigned, 2) => read_u16(buf, offset)? as f32,
        (FieldKind::Unsigned, 4) => read_u32(buf, offset)? as f32,
        (FieldKind::Float, 4) => read_f32(buf, offset)?,
        (FieldKind::Float, 8) => read_f64(buf, offset)? as f32,
        _ => 0.0,
    })
}

/// Read a little-endian f32 from a byte buffer
#[inline]
fn read_f32(buf: &[u8], offset: usize) -> Result<f32, PcdError> {
    let slice = buf
        .get(offset..offset + 4)
        .ok_or(PcdError::TruncatedPayload {
            expected: offset + 4,
            actual: buf.len(),
        })?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    Ok(f32::from_le_bytes(bytes))
}

/// Read a little-endian f64 from a byte buffer
#[inline]
fn read_f64(buf: &[u8], offset: usize) -> Result<f64, PcdError> {
    let slice = buf
        .get(offset..offset + 8)
        .ok_or(PcdError::TruncatedPayload {
            expected: offset + 8,
            actual: buf.len(),
        })?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(slice);
    Ok(f64::from_le_bytes(bytes))
}

/// Read a little-endian u32 from a byte buffer
#[inline]
fn read_u32(buf: &[u8], offset: usize) -> Result<u32, PcdError> {
    let slice = buf
        .get(offset..offset + 4)
        .ok_or(PcdError::TruncatedPayload {
            expected: offset + 4,
            actual: buf.len(),
        })?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    Ok(u32::from_le_bytes(bytes))
}

/// Read a little-endian u16 from a byte buffer
#[inline]
fn read_u16(buf: &[u8], offset: usize) -> Result<u16, PcdError> {
    let slice = buf
        .get(offset..offset + 2)
        .ok_or(PcdError::TruncatedPayload {
            expected: offset + 2,
            actual: buf.len(),
        })?;
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(slice);
    Ok(u16::from_le_bytes(bytes))
}

#[inline]
fn read_u8(buf: &[u8], offset: usize) -> Result<u8, PcdError> {
    buf.get(offset).copied().ok_or(PcdError::TruncatedPayload {
        expected: offset + 1,
        actual: buf.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn white() -> Color {
        Color::new(1.0, 1.0, 1.0)
    }

    fn pcd_file(header: &str, payload: &[u8]) -> Vec<u8> {
        let mut data = header.as_bytes().to_vec();
        data.extend_from_slice(payload);
        data
    }

    fn lzf_literals(raw: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in raw.chunks(32) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
        out
    }

    fn compressed_pcd_file(header: &str, raw: &[u8]) -> Vec<u8> {
        let stream = lzf_literals(raw);
        let mut data = header.as_bytes().to_vec();
        data.extend_from_slice(&(stream.len() as u32).to_le_bytes());
        data.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        data.extend_from_slice(&stream);
        data
    }

    #[test]
    fn ascii_positions_match_lines() {
        let data = b"FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 3
DATA ascii
0.0 1.0 2.0
3.5 -1.25 7.0

9 8 7
";
        let cloud = parse_pcd_bytes(data, "scan", white()).unwrap();
        assert_eq!(cloud.len(), 3);
        assert_eq!(
            cloud.positions(),
            &vec![[0.0, 1.0, 2.0], [3.5, -1.25, 7.0], [9.0, 8.0, 7.0]]
        );
        assert!(cloud.colors().is_none());
        assert!(cloud.normals().is_none());
    }

    #[test]
    fn ascii_respects_field_order() {
        let data = b"FIELDS z x y
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA ascii
1 2 3
";
        let cloud = parse_pcd_bytes(data, "scan", white()).unwrap();
        assert_eq!(cloud.positions(), &vec![[2.0, 3.0, 1.0]]);
    }

    #[test]
    fn ascii_rgb_unpacks_packed_integer() {
        // 1690658 == 0x19CC22
        let data = b"FIELDS x y z rgb
SIZE 4 4 4 4
TYPE F F F U
POINTS 1
DATA ascii
0 0 0 1690658
";
        let cloud = parse_pcd_bytes(data, "scan", white()).unwrap();
        let colors = cloud.colors().unwrap();
        assert_relative_eq!(colors[0][0], 25.0 / 255.0);
        assert_relative_eq!(colors[0][1], 204.0 / 255.0);
        assert_relative_eq!(colors[0][2], 34.0 / 255.0);
    }

    #[test]
    fn ascii_reads_normals() {
        let data = b"FIELDS x y z normal_x normal_y normal_z
SIZE 4 4 4 4 4 4
TYPE F F F F F F
POINTS 1
DATA ascii
1 2 3 0 1 0
";
        let cloud = parse_pcd_bytes(data, "scan", white()).unwrap();
        assert_eq!(cloud.normals().unwrap(), &vec![[0.0, 1.0, 0.0]]);
    }

    #[test]
    fn ascii_malformed_token_is_fatal() {
        let data = b"FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 2
DATA ascii
1 2 3
1 oops 3
";
        let err = parse_pcd_bytes(data, "scan", white()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::MalformedAsciiValue { line: 2, ref field } if field == "y"
        ));
    }

    #[test]
    fn ascii_without_position_fields() {
        let data = b"FIELDS intensity
SIZE 1
TYPE U
POINTS 2
DATA ascii
7
9
";
        let cloud = parse_pcd_bytes(data, "scan", white()).unwrap();
        assert_eq!(cloud.len(), 2);
        assert!(cloud.positions().is_empty());
        assert!(cloud.colors().is_none());
    }

    #[test]
    fn binary_xyz_with_u16_intensity() {
        let header = "FIELDS x y z intensity
SIZE 4 4 4 2
TYPE F F F U
COUNT 1 1 1 1
WIDTH 2
HEIGHT 1
POINTS 2
DATA binary
";
        let mut payload = Vec::new();
        for (point, intensity) in [([1.0f32, 2.0, 3.0], 0u16), ([4.0, 5.0, 6.0], 144)] {
            for v in point {
                payload.extend_from_slice(&v.to_le_bytes());
            }
            payload.extend_from_slice(&intensity.to_le_bytes());
        }

        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions(), &vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        // white base color: intensity renders as pure lightness
        let colors = cloud.colors().unwrap();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], [0.25, 0.25, 0.25]);
        assert_eq!(colors[1], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn binary_intensity_affine_lightness() {
        let header = "FIELDS intensity
SIZE 2
TYPE U
POINTS 4
DATA binary
";
        let mut payload = Vec::new();
        for intensity in [0u16, 96, 144, 192] {
            payload.extend_from_slice(&intensity.to_le_bytes());
        }

        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        let colors = cloud.colors().unwrap();
        // lightness = intensity / 192 + 0.25, clamped to 1.0 from 144 up
        assert_eq!(colors[0], [0.25, 0.25, 0.25]);
        assert_eq!(colors[1], [0.75, 0.75, 0.75]);
        assert_eq!(colors[2], [1.0, 1.0, 1.0]);
        assert_eq!(colors[3], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn binary_intensity_keeps_base_hue() {
        let header = "FIELDS intensity
SIZE 1
TYPE U
POINTS 1
DATA binary
";
        let red = Color::new(1.0, 0.0, 0.0);
        let cloud = parse_pcd_bytes(&pcd_file(header, &[0u8]), "scan", red).unwrap();
        let colors = cloud.colors().unwrap();
        // dark red: hue and saturation survive, lightness floors at 0.25
        assert_relative_eq!(colors[0][0], 0.5, epsilon = 1e-5);
        assert_relative_eq!(colors[0][1], 0.0, epsilon = 1e-5);
        assert_relative_eq!(colors[0][2], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn binary_float_intensity() {
        let header = "FIELDS intensity
SIZE 4
TYPE F
POINTS 1
DATA binary
";
        let payload = 96.0f32.to_le_bytes();
        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        assert_eq!(cloud.colors().unwrap()[0], [0.75, 0.75, 0.75]);
    }

    #[test]
    fn binary_rgb_bytes_are_reversed() {
        let header = "FIELDS x y z rgb
SIZE 4 4 4 4
TYPE F F F U
POINTS 1
DATA binary
";
        let mut payload = Vec::new();
        for v in [0.0f32, 0.0, 0.0] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        payload.extend_from_slice(&[10, 20, 30, 0]);

        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        let colors = cloud.colors().unwrap();
        assert_relative_eq!(colors[0][0], 30.0 / 255.0);
        assert_relative_eq!(colors[0][1], 20.0 / 255.0);
        assert_relative_eq!(colors[0][2], 10.0 / 255.0);
    }

    #[test]
    fn binary_intensity_wins_over_rgb() {
        let header = "FIELDS intensity rgb
SIZE 1 4
TYPE U U
POINTS 1
DATA binary
";
        let payload = [0u8, 10, 20, 30, 0];
        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        let colors = cloud.colors().unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0], [0.25, 0.25, 0.25]);
    }

    #[test]
    fn binary_reads_normals() {
        let header = "FIELDS x y z normal_x normal_y normal_z
SIZE 4 4 4 4 4 4
TYPE F F F F F F
POINTS 1
DATA binary
";
        let mut payload = Vec::new();
        for v in [1.0f32, 2.0, 3.0, 0.0, 0.0, 1.0] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let cloud = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap();
        assert_eq!(cloud.normals().unwrap(), &vec![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn binary_truncated_payload_is_fatal() {
        let header = "FIELDS x y z intensity
SIZE 4 4 4 2
TYPE F F F U
POINTS 2
DATA binary
";
        // one 14-byte record instead of two
        let payload = [0u8; 14];
        let err = parse_pcd_bytes(&pcd_file(header, &payload), "scan", white()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::TruncatedPayload {
                expected: 28,
                actual: 14
            }
        ));
    }

    #[test]
    fn compressed_payload_is_field_major() {
        let header = "FIELDS x y z
SIZE 4 4 4
TYPE F F F
WIDTH 4
HEIGHT 1
POINTS 4
DATA binary_compressed
";
        // structure of arrays: all x, then all y, then all z
        let mut raw = Vec::new();
        for v in [0.0f32, 1.0, 2.0, 3.0] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        for v in [10.0f32, 11.0, 12.0, 13.0] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        for v in [20.0f32, 21.0, 22.0, 23.0] {
            raw.extend_from_slice(&v.to_le_bytes());
        }

        let cloud =
            parse_pcd_bytes(&compressed_pcd_file(header, &raw), "scan", white()).unwrap();
        assert_eq!(cloud.len(), 4);
        assert_eq!(
            cloud.positions(),
            &vec![
                [0.0, 10.0, 20.0],
                [1.0, 11.0, 21.0],
                [2.0, 12.0, 22.0],
                [3.0, 13.0, 23.0]
            ]
        );
    }

    #[test]
    fn compressed_rgb_in_stored_order() {
        let header = "FIELDS rgb
SIZE 4
TYPE U
POINTS 2
DATA binary_compressed
";
        let raw = [10u8, 20, 30, 0, 40, 50, 60, 0];
        let cloud =
            parse_pcd_bytes(&compressed_pcd_file(header, &raw), "scan", white()).unwrap();
        let colors = cloud.colors().unwrap();
        assert_relative_eq!(colors[0][0], 10.0 / 255.0);
        assert_relative_eq!(colors[0][1], 20.0 / 255.0);
        assert_relative_eq!(colors[0][2], 30.0 / 255.0);
        assert_relative_eq!(colors[1][0], 40.0 / 255.0);
    }

    #[test]
    fn compressed_reads_normals() {
        let header = "FIELDS normal_x normal_y normal_z
SIZE 4 4 4
TYPE F F F
POINTS 2
DATA binary_compressed
";
        let mut raw = Vec::new();
        for v in [0.0f32, 1.0, 1.0, 0.0, 0.0, 0.0] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        let cloud =
            parse_pcd_bytes(&compressed_pcd_file(header, &raw), "scan", white()).unwrap();
        assert_eq!(
            cloud.normals().unwrap(),
            &vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn compressed_corrupt_stream_is_fatal() {
        let header = "FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA binary_compressed
";
        // the stream decodes to 32 bytes but only 10 are declared
        let stream = lzf_literals(&[0u8; 32]);
        let mut data = header.as_bytes().to_vec();
        data.extend_from_slice(&(stream.len() as u32).to_le_bytes());
        data.extend_from_slice(&10u32.to_le_bytes());
        data.extend_from_slice(&stream);

        let err = parse_pcd_bytes(&data, "scan", white()).unwrap_err();
        assert!(matches!(err, PcdError::CorruptCompressedPayload(_)));
    }

    #[test]
    fn compressed_missing_size_prefix_is_fatal() {
        let header = "FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA binary_compressed
";
        let err = parse_pcd_bytes(&pcd_file(header, &[0u8; 4]), "scan", white()).unwrap_err();
        assert!(matches!(err, PcdError::TruncatedPayload { .. }));
    }

    #[test]
    fn compressed_too_small_for_point_count_is_fatal() {
        let header = "FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 2
DATA binary_compressed
";
        // decompresses fine, but carries one point instead of two
        let raw = [0u8; 12];
        let err =
            parse_pcd_bytes(&compressed_pcd_file(header, &raw), "scan", white()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::TruncatedPayload {
                expected: 24,
                actual: 12
            }
        ));
    }

    #[test]
    fn name_is_passed_through() {
        let data = b"FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA ascii
1 2 3
";
        let cloud = parse_pcd_bytes(data, "frame-0042", white()).unwrap();
        assert_eq!(cloud.name(), "frame-0042");
    }

    #[test]
    fn read_pcd_uses_file_stem_as_name() {
        let data = b"FIELDS x y z
SIZE 4 4 4
TYPE F F F
POINTS 1
DATA ascii
1 2 3
";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan-0042.pcd");
        std::fs::write(&path, data).unwrap();

        let cloud = read_pcd(&path, white()).unwrap();
        assert_eq!(cloud.name(), "scan-0042");
        assert_eq!(cloud.positions(), &vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn read_pcd_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.ply");
        std::fs::write(&path, b"ply").unwrap();

        let err = read_pcd(&path, white()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::InvalidFileExtension(ext) if ext == "ply"
        ));
    }
}
