pub mod sprite;
pub mod text;
