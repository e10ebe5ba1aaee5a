//! Object kinds the definition loader can instantiate.

mod behaviour;
mod condition;
mod integer;
mod timer;
mod vector;

pub use behaviour::{Behaviour, INIT_BEHAVIOUR};
pub use condition::{Condition, Operator};
pub use integer::Integer;
pub use timer::Timer;
pub use vector::Vector;
