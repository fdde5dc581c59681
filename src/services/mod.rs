pub mod input;
pub mod session;

pub use input::Input;
pub use session::{Completions, Session};
