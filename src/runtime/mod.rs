//! Runtime evaluation of parsed expressions

mod context;
mod evaluator;
mod methods;
mod value;

pub use context::Context;
pub use evaluator::{Evaluator, DEFAULT_MAX_DEPTH};
pub use value::{Key, Value};
