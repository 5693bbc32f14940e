//! Imports for syntax extensions.

pub use crate::IntoEndpointUrl as _;
pub use crate::response::WrappedResponse as _;
pub use crate::secrecy::ExposeSecret as _;
