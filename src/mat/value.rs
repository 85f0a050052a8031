use ndarray::{Array2, ShapeBuilder};

use super::error::MatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericClass {
    Double,
    Single,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

impl NumericClass {
    pub fn from_class_id(id: u8) -> Option<Self> {
        let class = match id {
            6 => NumericClass::Double,
            7 => NumericClass::Single,
            8 => NumericClass::Int8,
            9 => NumericClass::UInt8,
            10 => NumericClass::Int16,
            11 => NumericClass::UInt16,
            12 => NumericClass::Int32,
            13 => NumericClass::UInt32,
            14 => NumericClass::Int64,
            15 => NumericClass::UInt64,
            _ => return None,
        };
        Some(class)
    }
}

/// A decoded MATLAB value.
#[derive(Clone, Debug, PartialEq)]
pub enum MatValue {
    Numeric(NumericArray),
    Char(CharArray),
    Cell(CellArray),
    Struct(StructArray),
    /// A zero length matrix element, as written for `[]`
    Empty,
}

impl MatValue {
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            MatValue::Numeric(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            MatValue::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatValue::Struct(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<&str> {
        match self {
            MatValue::Char(chars) => Some(&chars.text),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MatValue::Numeric(_) => "numeric",
            MatValue::Char(_) => "char",
            MatValue::Cell(_) => "cell",
            MatValue::Struct(_) => "struct",
            MatValue::Empty => "empty",
        }
    }
}

/// Number of elements described by a dimension vector.
pub fn element_count(dims: &[usize]) -> Result<usize, MatError> {
    dims.iter()
        .try_fold(1usize, |count, &d| count.checked_mul(d))
        .ok_or_else(|| MatError::Malformed(format!("dimensions {:?} overflow the element count", dims)))
}

// All array payloads keep MATLAB's column-major element order.

#[derive(Clone, Debug, PartialEq)]
pub struct NumericArray {
    pub(crate) class: NumericClass,
    pub(crate) dims: Vec<usize>,
    pub(crate) real: Vec<f64>,
    pub(crate) imag: Option<Vec<f64>>,
    pub(crate) logical: bool,
}

impl NumericArray {
    pub fn class(&self) -> NumericClass {
        self.class
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn real(&self) -> &[f64] {
        &self.real
    }

    pub fn imag(&self) -> Option<&[f64]> {
        self.imag.as_deref()
    }

    pub fn is_logical(&self) -> bool {
        self.logical
    }

    /// The real part as a (rows, cols) array. Fails for anything that is not 2-D.
    pub fn to_array2(&self) -> Result<Array2<f64>, MatError> {
        let (rows, cols) = match self.dims.as_slice() {
            [rows, cols] => (*rows, *cols),
            dims => {
                return Err(MatError::Malformed(format!(
                    "expected a 2-D array, found dimensions {:?}",
                    dims
                )))
            }
        };

        let array = Array2::from_shape_vec((rows, cols).f(), self.real.clone())
            .map_err(|e| MatError::Malformed(e.to_string()))?;

        Ok(array.as_standard_layout().into_owned())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CharArray {
    pub(crate) dims: Vec<usize>,
    pub(crate) text: String,
}

impl CharArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellArray {
    pub(crate) dims: Vec<usize>,
    pub(crate) cells: Vec<MatValue>,
}

impl CellArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MatValue> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatValue> {
        self.cells.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructArray {
    pub(crate) dims: Vec<usize>,
    pub(crate) field_names: Vec<String>,
    // element-major: all fields of element 0, then all fields of element 1, ...
    pub(crate) values: Vec<MatValue>,
}

impl StructArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of struct elements.
    pub fn len(&self) -> usize {
        // checked by element_count when parsed
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn field_at(&self, element: usize, field_index: usize) -> Option<&MatValue> {
        if field_index >= self.field_names.len() {
            return None;
        }
        self.values
            .get(element * self.field_names.len() + field_index)
    }

    pub fn field(&self, element: usize, name: &str) -> Option<&MatValue> {
        let field_index = self.field_names.iter().position(|f| f == name)?;
        self.field_at(element, field_index)
    }
}
