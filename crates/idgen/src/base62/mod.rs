mod codec;
mod error;
mod interface;

pub use codec::*;
pub use error::*;
pub use interface::*;
