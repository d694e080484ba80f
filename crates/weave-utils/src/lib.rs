mod arena;
mod str;

pub use arena::{Arena, ArenaKey};
pub use str::SmallStr;
