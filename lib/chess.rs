mod board;
mod color;
mod file;
mod r#move;
mod piece;
mod position;
mod rank;
mod ray;
mod role;
mod square;

pub use board::*;
pub use color::*;
pub use file::*;
pub use piece::*;
pub use position::*;
pub use r#move::*;
pub use rank::*;
pub use ray::*;
pub use role::*;
pub use square::*;
