pub mod decode;
pub mod endpoints;
pub mod records;

pub use decode::*;
pub use endpoints::*;
pub use records::*;
