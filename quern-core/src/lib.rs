mod as_value;
mod builder;
mod column;
mod compiler;
mod connection;
mod container;
mod context;
mod entity;
mod error;
mod expression;
mod interceptor;
mod kernel;
mod mapper;
mod operation;
mod part;
mod row;
mod settings;
mod table_ref;
mod util;
mod value;

pub use as_value::*;
pub use builder::*;
pub use column::*;
pub use compiler::*;
pub use connection::*;
pub use container::*;
pub use context::*;
pub use entity::*;
pub use error::*;
pub use expression::*;
pub use interceptor::*;
pub use kernel::*;
pub use mapper::*;
pub use operation::*;
pub use part::*;
pub use row::*;
pub use settings::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
