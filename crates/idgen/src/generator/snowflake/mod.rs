mod interface;
mod lock;
#[cfg(test)]
mod tests;

pub use interface::*;
pub use lock::*;
