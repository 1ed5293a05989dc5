extern crate pest;
#[macro_use]
extern crate pest_derive;
pub mod gg_error;
pub mod format_specs;
pub mod buffer;
pub mod convert;
pub mod render;
#[cfg(feature = "serde")]
pub mod serde_error;
#[cfg(feature = "serde")]
pub mod ser;
