#![doc = include_str!("../README.md")]

pub(crate) mod bar;
pub(crate) mod multi;
pub(crate) mod render;
pub(crate) mod spinner;


/// Re-exports of all public types.
pub mod prelude {
    pub use crate::bar::{Bar, UNDEFINED};
    pub use crate::multi::MultiBar;
    pub use crate::spinner::Spinner;
}

pub use crate::prelude::*;
