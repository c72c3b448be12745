pub mod address;
pub mod extractor;

pub use address::{parse_address, AddressParts};
pub use extractor::{Extraction, FieldExtractor, HttpExtractor};
