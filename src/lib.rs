#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod field;
pub mod group;
pub mod path;
pub mod prelude;
pub mod quantity;
pub mod scenario;
pub mod session;
pub mod settings;
pub mod solver;
pub mod validation;
