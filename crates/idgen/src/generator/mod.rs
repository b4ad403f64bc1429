mod snowflake;
mod uuid_v7;

pub use snowflake::*;
pub use uuid_v7::*;
