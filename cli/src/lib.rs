//! Command-line host for the rental client core.
//!
//! # Overview
//! The core crate builds requests and holds page state; this crate performs
//! the I/O. `ReqwestTransport` executes requests, `Session` runs each one
//! under a cancellation token, and `pages` renders each route as text and
//! follows the form's navigation to the confirmation page.

pub mod pages;
pub mod session;
pub mod transport;

pub use pages::{App, Page, RentInput};
pub use session::{run_cancellable, Session};
pub use transport::{ReqwestTransport, DEFAULT_ORIGIN};
