mod environment;
mod errors;
mod evaluator;
mod object;
mod procedure;

pub use environment::Environment;
pub use errors::EvalError;
pub use evaluator::{Evaluator, MAX_CALL_DEPTH};
pub use object::{Object, ObjectType};
pub use procedure::Procedure;
