pub mod macros;
pub mod subject;
pub mod time;


pub use subject::*;
pub use time::*;
