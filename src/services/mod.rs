//! Operations the request-handling layer calls. Each validates its input,
//! resolves candidates through the repositories and delegates scoring to
//! [`crate::engine`].

pub mod donations;
pub mod orders;
pub mod recommendations;
