use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;

use super::error::MatError;
use super::reader::{ByteReader, DataType, Endian};
use super::value::{element_count, CellArray, CharArray, MatValue, NumericArray, NumericClass, StructArray};

const HEADER_LEN: usize = 128;
const HEADER_TEXT_LEN: usize = 116;
const VERSION_5: u16 = 0x0100;

const CLASS_CELL: u8 = 1;
const CLASS_STRUCT: u8 = 2;
const CLASS_CHAR: u8 = 4;

const FLAG_COMPLEX: u32 = 0x0800;
const FLAG_LOGICAL: u32 = 0x0200;

// Deepest cell/struct nesting accepted; ground truth bundles use two levels
const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug, PartialEq)]
pub struct MatVariable {
    pub name: String,
    pub value: MatValue,
}

/// A fully decoded Level 5 MAT-file.
#[derive(Clone, Debug)]
pub struct MatFile {
    header_text: String,
    endian: Endian,
    variables: Vec<MatVariable>,
}

impl MatFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MatError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, MatError> {
        if bytes.len() < HEADER_LEN {
            return Err(MatError::TruncatedHeader(bytes.len()));
        }

        let endian = Endian::from_indicator([bytes[126], bytes[127]])?;
        let version = endian.u16([bytes[124], bytes[125]]);
        if version != VERSION_5 {
            return Err(MatError::UnsupportedVersion(version));
        }

        let header_text = String::from_utf8_lossy(&bytes[..HEADER_TEXT_LEN])
            .trim_end_matches(['\0', ' '])
            .to_string();

        let mut reader = ByteReader::new(&bytes[HEADER_LEN..], endian);
        let mut variables = Vec::new();
        read_variables(&mut reader, &mut variables, 0)?;

        Ok(MatFile {
            header_text,
            endian,
            variables,
        })
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn variables(&self) -> &[MatVariable] {
        &self.variables
    }

    pub fn get(&self, name: &str) -> Option<&MatValue> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(|variable| &variable.value)
    }
}

fn read_variables(
    reader: &mut ByteReader,
    variables: &mut Vec<MatVariable>,
    depth: usize,
) -> Result<(), MatError> {
    check_depth(depth)?;

    // Anything shorter than a tag at the end is trailing padding
    while reader.remaining() >= 8 {
        let element = reader.read_element()?;
        match element.data_type {
            DataType::Matrix => {
                let (name, value) = parse_matrix(element.data, reader.endian(), depth)?;
                variables.push(MatVariable { name, value });
            }
            DataType::Compressed => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(element.data)
                    .read_to_end(&mut inflated)
                    .map_err(MatError::Decompress)?;

                let mut inner = ByteReader::new(&inflated, reader.endian());
                read_variables(&mut inner, variables, depth + 1)?;
            }
            other => {
                return Err(MatError::UnexpectedDataType {
                    expected: "miMATRIX or miCOMPRESSED",
                    found: other.code(),
                })
            }
        }
    }
    Ok(())
}

/// Parses the payload of a miMATRIX element into its array name and value.
fn parse_matrix(data: &[u8], endian: Endian, depth: usize) -> Result<(String, MatValue), MatError> {
    if data.is_empty() {
        return Ok((String::new(), MatValue::Empty));
    }

    let mut reader = ByteReader::new(data, endian);

    let flags_element = reader.read_element()?;
    flags_element.expect(DataType::UInt32, "miUINT32")?;
    if flags_element.data.len() < 8 {
        return Err(MatError::Malformed("array flags shorter than 8 bytes".into()));
    }
    let flags_bytes = flags_element.data;
    let flags = endian.u32([flags_bytes[0], flags_bytes[1], flags_bytes[2], flags_bytes[3]]);
    let class_id = (flags & 0xFF) as u8;

    let dims = reader
        .read_element()?
        .to_i32_vec(endian)?
        .into_iter()
        .map(|d| {
            usize::try_from(d).map_err(|_| MatError::Malformed(format!("negative dimension {}", d)))
        })
        .collect::<Result<Vec<usize>, MatError>>()?;

    let name_element = reader.read_element()?;
    let name = String::from_utf8_lossy(name_element.data).into_owned();

    let value = match class_id {
        CLASS_CELL => parse_cell(&mut reader, dims, depth)?,
        CLASS_STRUCT => parse_struct(&mut reader, dims, depth)?,
        CLASS_CHAR => parse_char(&mut reader, dims)?,
        id => match NumericClass::from_class_id(id) {
            Some(class) => parse_numeric(&mut reader, class, dims, flags)?,
            None => return Err(MatError::UnsupportedClass(id)),
        },
    };

    Ok((name, value))
}

fn check_depth(depth: usize) -> Result<(), MatError> {
    if depth > MAX_DEPTH {
        return Err(MatError::Malformed(format!(
            "elements nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(())
}

fn read_nested_matrix(reader: &mut ByteReader, depth: usize) -> Result<MatValue, MatError> {
    check_depth(depth)?;
    let element = reader.read_element()?;
    element.expect(DataType::Matrix, "miMATRIX")?;
    let (_, value) = parse_matrix(element.data, reader.endian(), depth)?;
    Ok(value)
}

fn parse_cell(reader: &mut ByteReader, dims: Vec<usize>, depth: usize) -> Result<MatValue, MatError> {
    let count = element_count(&dims)?;
    let cells = (0..count)
        .map(|_| read_nested_matrix(reader, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MatValue::Cell(CellArray { dims, cells }))
}

fn parse_struct(reader: &mut ByteReader, dims: Vec<usize>, depth: usize) -> Result<MatValue, MatError> {
    let endian = reader.endian();

    let name_len = match reader.read_element()?.to_i32_vec(endian)?.as_slice() {
        [len] if *len > 0 => *len as usize,
        other => {
            return Err(MatError::Malformed(format!(
                "invalid struct field name length {:?}",
                other
            )))
        }
    };

    let names_element = reader.read_element()?;
    let field_names: Vec<String> = names_element
        .data
        .chunks(name_len)
        .map(|chunk| {
            let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
            String::from_utf8_lossy(&chunk[..end]).into_owned()
        })
        .collect();

    let count = element_count(&dims)?
        .checked_mul(field_names.len())
        .ok_or_else(|| MatError::Malformed(format!("struct of dimensions {:?} is too large", dims)))?;
    let values = (0..count)
        .map(|_| read_nested_matrix(reader, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MatValue::Struct(StructArray {
        dims,
        field_names,
        values,
    }))
}

fn parse_char(reader: &mut ByteReader, dims: Vec<usize>) -> Result<MatValue, MatError> {
    let endian = reader.endian();
    if reader.is_empty() {
        return Ok(MatValue::Char(CharArray { dims, text: String::new() }));
    }

    let element = reader.read_element()?;
    let text = match element.data_type {
        DataType::UInt16 | DataType::Utf16 => {
            let units: Vec<u16> = element
                .data
                .chunks_exact(2)
                .map(|chunk| endian.u16([chunk[0], chunk[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        DataType::Utf8 | DataType::UInt8 | DataType::Int8 => {
            String::from_utf8_lossy(element.data).into_owned()
        }
        other => {
            return Err(MatError::UnexpectedDataType {
                expected: "character data",
                found: other.code(),
            })
        }
    };

    Ok(MatValue::Char(CharArray { dims, text }))
}

fn parse_numeric(
    reader: &mut ByteReader,
    class: NumericClass,
    dims: Vec<usize>,
    flags: u32,
) -> Result<MatValue, MatError> {
    let endian = reader.endian();
    let expected = element_count(&dims)?;

    // The stored type may be narrower than the class, e.g. a double array saved as uint8
    let real = if expected == 0 && reader.is_empty() {
        Vec::new()
    } else {
        reader.read_element()?.to_f64_vec(endian)?
    };
    if real.len() != expected {
        return Err(MatError::Malformed(format!(
            "array of dimensions {:?} holds {} values",
            dims,
            real.len()
        )));
    }

    let imag = if flags & FLAG_COMPLEX != 0 {
        let imag = reader.read_element()?.to_f64_vec(endian)?;
        if imag.len() != expected {
            return Err(MatError::Malformed("imaginary part length mismatch".into()));
        }
        Some(imag)
    } else {
        None
    };

    Ok(MatValue::Numeric(NumericArray {
        class,
        dims,
        real,
        imag,
        logical: flags & FLAG_LOGICAL != 0,
    }))
}
