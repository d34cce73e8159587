pub mod commands;
pub mod types;

pub use commands::RenderCommand;
pub use types::{Background, Color, Pos2};
