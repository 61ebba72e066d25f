pub use quern_core::*;
pub use quern_macros::{expr, Entity};
