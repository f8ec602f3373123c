pub mod core;
pub mod histogram;
pub mod key;


pub use self::core::*;
pub use self::histogram::*;
pub use self::key::*;
