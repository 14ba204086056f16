pub mod compile;
pub mod diagnostics;
pub mod doc_export;
pub mod health;

pub use compile::*;
pub use diagnostics::*;
pub use doc_export::*;
pub use health::*;
