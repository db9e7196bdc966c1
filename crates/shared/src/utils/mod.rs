mod date;
pub use date::*;

mod number;
pub use number::*;
