use super::error::MatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    // Written by MATLAB as the u16 0x4D49 ("MI"), so a little endian file stores "IM"
    pub fn from_indicator(indicator: [u8; 2]) -> Result<Self, MatError> {
        match &indicator {
            b"IM" => Ok(Endian::Little),
            b"MI" => Ok(Endian::Big),
            _ => Err(MatError::InvalidEndianIndicator(indicator)),
        }
    }

    pub fn u16(&self, bytes: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(&self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Single,
    Double,
    Int64,
    UInt64,
    Matrix,
    Compressed,
    Utf8,
    Utf16,
    Utf32,
}

impl DataType {
    pub fn from_u32(value: u32) -> Result<Self, MatError> {
        let data_type = match value {
            1 => DataType::Int8,
            2 => DataType::UInt8,
            3 => DataType::Int16,
            4 => DataType::UInt16,
            5 => DataType::Int32,
            6 => DataType::UInt32,
            7 => DataType::Single,
            9 => DataType::Double,
            12 => DataType::Int64,
            13 => DataType::UInt64,
            14 => DataType::Matrix,
            15 => DataType::Compressed,
            16 => DataType::Utf8,
            17 => DataType::Utf16,
            18 => DataType::Utf32,
            other => return Err(MatError::UnknownDataType(other)),
        };
        Ok(data_type)
    }

    pub fn code(&self) -> u32 {
        match self {
            DataType::Int8 => 1,
            DataType::UInt8 => 2,
            DataType::Int16 => 3,
            DataType::UInt16 => 4,
            DataType::Int32 => 5,
            DataType::UInt32 => 6,
            DataType::Single => 7,
            DataType::Double => 9,
            DataType::Int64 => 12,
            DataType::UInt64 => 13,
            DataType::Matrix => 14,
            DataType::Compressed => 15,
            DataType::Utf8 => 16,
            DataType::Utf16 => 17,
            DataType::Utf32 => 18,
        }
    }

    /// Size in bytes of one value, `None` for container and text types.
    pub fn value_size(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::UInt8 => Some(1),
            DataType::Int16 | DataType::UInt16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Single => Some(4),
            DataType::Double | DataType::Int64 | DataType::UInt64 => Some(8),
            _ => None,
        }
    }
}

pub struct Element<'a> {
    pub data_type: DataType,
    pub data: &'a [u8],
}

impl Element<'_> {
    pub fn expect(&self, expected: DataType, name: &'static str) -> Result<(), MatError> {
        if self.data_type != expected {
            return Err(MatError::UnexpectedDataType {
                expected: name,
                found: self.data_type.code(),
            });
        }
        Ok(())
    }

    /// Decodes every value of a numeric element into f64, in storage order.
    pub fn to_f64_vec(&self, endian: Endian) -> Result<Vec<f64>, MatError> {
        let size = self.data_type.value_size().ok_or(MatError::UnexpectedDataType {
            expected: "numeric",
            found: self.data_type.code(),
        })?;

        if self.data.len() % size != 0 {
            return Err(MatError::Malformed(format!(
                "{} bytes is not a multiple of the {} byte value size",
                self.data.len(),
                size
            )));
        }

        let values = self
            .data
            .chunks_exact(size)
            .map(|chunk| decode_value(self.data_type, chunk, endian))
            .collect();

        Ok(values)
    }

    pub fn to_i32_vec(&self, endian: Endian) -> Result<Vec<i32>, MatError> {
        self.expect(DataType::Int32, "miINT32")?;
        if self.data.len() % 4 != 0 {
            return Err(MatError::Malformed(format!(
                "{} bytes of miINT32 data is not a whole number of values",
                self.data.len()
            )));
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|chunk| endian.u32([chunk[0], chunk[1], chunk[2], chunk[3]]) as i32)
            .collect())
    }
}

fn decode_value(data_type: DataType, chunk: &[u8], endian: Endian) -> f64 {
    macro_rules! read {
        ($ty:ty, $n:expr) => {{
            let mut bytes = [0u8; $n];
            bytes.copy_from_slice(chunk);
            match endian {
                Endian::Little => <$ty>::from_le_bytes(bytes),
                Endian::Big => <$ty>::from_be_bytes(bytes),
            }
        }};
    }

    match data_type {
        DataType::Int8 => read!(i8, 1) as f64,
        DataType::UInt8 => read!(u8, 1) as f64,
        DataType::Int16 => read!(i16, 2) as f64,
        DataType::UInt16 => read!(u16, 2) as f64,
        DataType::Int32 => read!(i32, 4) as f64,
        DataType::UInt32 => read!(u32, 4) as f64,
        DataType::Single => read!(f32, 4) as f64,
        DataType::Double => read!(f64, 8),
        DataType::Int64 => read!(i64, 8) as f64,
        DataType::UInt64 => read!(u64, 8) as f64,
        // value_size() already rejected everything else
        _ => f64::NAN,
    }
}

pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8], endian: Endian) -> Self {
        ByteReader { buf, pos: 0, endian }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], MatError> {
        if n > self.remaining() {
            return Err(MatError::UnexpectedEof {
                needed: n,
                offset: self.pos,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32, MatError> {
        let bytes = self.take(4)?;
        Ok(self.endian.u32([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads one tagged data element, consuming the 8 byte alignment padding that follows it.
    pub fn read_element(&mut self) -> Result<Element<'a>, MatError> {
        let first = self.read_u32()?;

        // Small data element: byte count in the upper 16 bits, payload packed into the tag
        if first >> 16 != 0 {
            let data_type = DataType::from_u32(first & 0xFFFF)?;
            let nbytes = (first >> 16) as usize;
            if nbytes > 4 {
                return Err(MatError::Malformed(format!(
                    "small data element claims {} bytes",
                    nbytes
                )));
            }
            let packed = self.take(4)?;
            return Ok(Element {
                data_type,
                data: &packed[..nbytes],
            });
        }

        let data_type = DataType::from_u32(first)?;
        let nbytes = self.read_u32()? as usize;
        let data = self.take(nbytes)?;

        // Compressed elements are not padded
        if data_type != DataType::Compressed {
            let padding = (8 - nbytes % 8) % 8;
            // Some writers drop the final padding at the end of the file
            self.pos += padding.min(self.remaining());
        }

        Ok(Element { data_type, data })
    }
}
