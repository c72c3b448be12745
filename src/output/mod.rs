pub mod assembler;

pub use assembler::{assemble_fallback, assemble_group};
