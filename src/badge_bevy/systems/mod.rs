mod input;
mod render;
mod toast;
mod types;

pub use input::*;
pub use render::*;
pub use toast::*;
pub use types::*;
