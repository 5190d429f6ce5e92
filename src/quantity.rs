#[macro_use]
mod macros;

pub mod charge;
pub mod energy;
pub mod kind;
pub mod power;
pub mod precision;
pub mod time;
pub mod triple;

pub use self::{kind::Kind, precision::Precision, triple::Triple};
