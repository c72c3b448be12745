pub mod decision;

pub use decision::DecisionEngine;
