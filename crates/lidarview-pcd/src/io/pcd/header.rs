use std::collections::HashMap;

use super::PcdError;

/// Payload encoding declared by the `DATA` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEncoding {
    /// Whitespace-separated text, one point per line.
    Ascii,
    /// Fixed-size little-endian records, one per point.
    Binary,
    /// LZF-compressed field-major (structure-of-arrays) payload.
    BinaryCompressed,
}

/// Storage class of a field, from the `TYPE` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer (`I`).
    Signed,
    /// Unsigned integer (`U`).
    Unsigned,
    /// Floating point (`F`).
    Float,
}

impl FieldKind {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "I" | "i" => Some(FieldKind::Signed),
            "U" | "u" => Some(FieldKind::Unsigned),
            "F" | "f" => Some(FieldKind::Float),
            _ => None,
        }
    }
}

/// A single field declared in a PCD header.
#[derive(Debug, Clone)]
pub struct PcdField {
    /// Field name as declared by `FIELDS`.
    pub name: String,
    /// Byte offset within one point record for the binary encodings; the
    /// ordinal column index for ascii.
    pub offset: usize,
    /// Size of one element in bytes.
    pub size: usize,
    /// Number of elements per point.
    pub count: usize,
    /// Storage class of the elements.
    pub kind: FieldKind,
}

/// Parsed PCD header directives.
#[derive(Debug, Clone)]
pub struct PcdHeader {
    /// Format version from `VERSION`, if present.
    pub version: Option<f32>,
    /// Field names in declaration order.
    pub field_names: Vec<String>,
    /// Field layout keyed by field name.
    pub fields: HashMap<String, PcdField>,
    /// Grid width from `WIDTH`, if present.
    pub width: Option<usize>,
    /// Grid height from `HEIGHT`, if present.
    pub height: Option<usize>,
    /// Verbatim `VIEWPOINT` value, if present.
    pub viewpoint: Option<String>,
    /// Number of points, from `POINTS` or `WIDTH * HEIGHT`.
    pub num_points: usize,
    /// Payload encoding from `DATA`.
    pub encoding: DataEncoding,
    /// Byte offset in the raw buffer where the payload begins.
    pub header_len: usize,
    /// Total bytes per point record in the binary encodings.
    pub row_size: usize,
}

impl PcdHeader {
    /// Look up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&PcdField> {
        self.fields.get(name)
    }

    /// Parse the header region of a raw PCD buffer.
    ///
    /// The header spans everything up to and including the `DATA` line;
    /// `#` comments may appear anywhere in it and are stripped before the
    /// directives are interpreted.
    pub fn parse(data: &[u8]) -> Result<Self, PcdError> {
        let header_len = find_header_end(data)?;
        let text = String::from_utf8_lossy(&data[..header_len]);

        let mut version = None;
        let mut field_names: Vec<String> = Vec::new();
        let mut sizes: Vec<usize> = Vec::new();
        let mut kinds: Vec<FieldKind> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut width = None;
        let mut height = None;
        let mut viewpoint = None;
        let mut points = None;
        let mut encoding = None;

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut it = line.split_whitespace();
            let Some(keyword) = it.next() else { continue };

            match keyword.to_ascii_uppercase().as_str() {
                "VERSION" => version = it.next().and_then(|v| v.parse().ok()),
                "FIELDS" => field_names = it.map(String::from).collect(),
                "SIZE" => sizes = parse_number_list(it, "SIZE")?,
                "TYPE" => {
                    kinds = it
                        .map(|token| {
                            FieldKind::from_token(token).ok_or_else(|| {
                                PcdError::MalformedHeader(format!(
                                    "unknown TYPE token '{token}'"
                                ))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                }
                "COUNT" => counts = parse_number_list(it, "COUNT")?,
                "WIDTH" => width = Some(parse_number(it.next(), "WIDTH")?),
                "HEIGHT" => height = Some(parse_number(it.next(), "HEIGHT")?),
                "VIEWPOINT" => {
                    viewpoint = line
                        .split_once(char::is_whitespace)
                        .map(|(_, rest)| rest.trim().to_string());
                }
                "POINTS" => points = Some(parse_number(it.next(), "POINTS")?),
                "DATA" => {
                    let token = it.next().ok_or_else(|| {
                        PcdError::MalformedHeader("DATA directive has no value".to_string())
                    })?;
                    encoding = Some(match token.to_ascii_lowercase().as_str() {
                        "ascii" => DataEncoding::Ascii,
                        "binary" => DataEncoding::Binary,
                        "binary_compressed" => DataEncoding::BinaryCompressed,
                        _ => return Err(PcdError::UnsupportedEncoding(token.to_string())),
                    });
                }
                _ => {}
            }
        }

        let encoding = encoding
            .ok_or_else(|| PcdError::MalformedHeader("missing DATA directive".to_string()))?;

        // COUNT is optional, defaulting to one element per field
        if counts.is_empty() {
            counts = vec![1; field_names.len()];
        }

        if sizes.len() != field_names.len()
            || kinds.len() != field_names.len()
            || counts.len() != field_names.len()
        {
            return Err(PcdError::MalformedHeader(format!(
                "FIELDS/SIZE/TYPE/COUNT length mismatch ({}/{}/{}/{})",
                field_names.len(),
                sizes.len(),
                kinds.len(),
                counts.len()
            )));
        }

        let num_points = match points {
            Some(points) => points,
            None => width.zip(height).map(|(w, h)| w * h).unwrap_or(0),
        };

        // Compute byte offsets for each field; for ascii the offset is the
        // ordinal column index instead.
        let mut fields = HashMap::new();
        let mut offset = 0usize;

        for (i, name) in field_names.iter().enumerate() {
            let field = PcdField {
                name: name.clone(),
                offset: match encoding {
                    DataEncoding::Ascii => i,
                    DataEncoding::Binary | DataEncoding::BinaryCompressed => offset,
                },
                size: sizes[i],
                count: counts[i],
                kind: kinds[i],
            };

            let field_bytes = sizes[i]
                .checked_mul(counts[i])
                .ok_or_else(|| PcdError::MalformedHeader("field span overflow".to_string()))?;
            offset = offset
                .checked_add(field_bytes)
                .ok_or_else(|| PcdError::MalformedHeader("record size overflow".to_string()))?;

            if fields.insert(name.clone(), field).is_some() {
                return Err(PcdError::MalformedHeader(format!(
                    "duplicate field '{name}'"
                )));
            }
        }

        Ok(Self {
            version,
            field_names,
            fields,
            width,
            height,
            viewpoint,
            num_points,
            encoding,
            header_len,
            row_size: offset,
        })
    }
}

fn parse_number_list<'a>(
    it: impl Iterator<Item = &'a str>,
    directive: &str,
) -> Result<Vec<usize>, PcdError> {
    it.map(|token| {
        token.parse::<usize>().map_err(|_| {
            PcdError::MalformedHeader(format!("bad {directive} value '{token}'"))
        })
    })
    .collect()
}

fn parse_number(token: Option<&str>, directive: &str) -> Result<usize, PcdError> {
    let token = token.ok_or_else(|| {
        PcdError::MalformedHeader(format!("{directive} directive has no value"))
    })?;
    token.parse::<usize>().map_err(|_| {
        PcdError::MalformedHeader(format!("bad {directive} value '{token}'"))
    })
}

/// Locate the end of the header: the byte just past the first line that
/// begins with `DATA` (case-insensitive), including its line terminator.
fn find_header_end(data: &[u8]) -> Result<usize, PcdError> {
    let mut pos = 0usize;
    while pos < data.len() {
        let line_end = data[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| pos + i + 1)
            .unwrap_or(data.len());
        if is_data_line(&data[pos..line_end]) {
            return Ok(line_end);
        }
        pos = line_end;
    }
    Err(PcdError::MalformedHeader(
        "missing DATA directive".to_string(),
    ))
}

fn is_data_line(line: &[u8]) -> bool {
    let mut line = line;
    while let Some((first, rest)) = line.split_first() {
        if first.is_ascii_whitespace() {
            line = rest;
        } else {
            break;
        }
    }
    line.len() >= 4
        && line[..4].eq_ignore_ascii_case(b"DATA")
        && line.get(4).map_or(true, |b| b.is_ascii_whitespace())
}
