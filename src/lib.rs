pub mod batch_verifier;
pub mod io;
pub mod matching;
pub mod models;
pub mod output;
pub mod processing;
pub mod utils;
pub mod validation;

pub use batch_verifier::BatchVerifier;
