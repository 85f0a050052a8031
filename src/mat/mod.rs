pub mod error;
pub mod mat_file;
pub mod reader;
pub mod value;

pub use error::MatError;
pub use mat_file::{MatFile, MatVariable};
pub use reader::Endian;
pub use value::{CellArray, CharArray, MatValue, NumericArray, NumericClass, StructArray};
