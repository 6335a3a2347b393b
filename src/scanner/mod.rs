pub mod conductor;
pub mod core;
pub mod titles;

pub use conductor::*;
pub use core::*;
pub use titles::*;
