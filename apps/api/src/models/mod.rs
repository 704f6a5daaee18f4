pub mod board;
pub mod image;
