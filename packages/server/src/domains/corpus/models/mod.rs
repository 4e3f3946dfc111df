pub mod root;
pub mod word;

pub use root::*;
pub use word::*;
