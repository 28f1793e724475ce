pub mod evaluator;
pub mod frontend;
