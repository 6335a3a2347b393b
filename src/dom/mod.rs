pub mod mutation;
pub mod tree;

pub use mutation::*;
pub use tree::*;
