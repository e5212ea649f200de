//! Credential, token, and assertion primitives shared across the authentication flow.

mod assertion;
mod credentials;
mod secret;
mod token;

pub use assertion::*;
pub use credentials::*;
pub use secret::*;
pub use token::*;
