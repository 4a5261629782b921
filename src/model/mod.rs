mod common;
mod game;
mod member;
mod rich_text;

pub use common::*;
pub use game::*;
pub use member::*;
pub use rich_text::*;
