#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
mod value;

pub mod decode;
pub mod encode;
pub mod source;

pub use error::{Error, Reason};
pub use value::{Dict, Kind, Value};


#[cfg(test)]
mod encode_tests;
