//! Museum Forms Validation
//!
//! Pure field rules and input formatters shared by the booking and contact
//! forms. Nothing here touches a page or a timer, so the same functions back
//! the native pipelines and the WASM bindings.

pub mod date;
pub mod email;
pub mod phone;
pub mod rules;
pub mod string;

pub use date::*;
pub use email::*;
pub use phone::*;
pub use rules::*;
pub use string::*;
