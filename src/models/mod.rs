pub mod compile;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod events;
pub mod health;

pub use compile::*;
pub use diagnostics::*;
pub use document::*;
pub use error::*;
pub use events::*;
pub use health::*;
