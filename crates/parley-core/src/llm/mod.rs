//! Model gateway abstraction and conversational context.
//!
//! The gateway trait lives here; concrete API clients live in
//! `parley-infra`.

pub mod box_gateway;
pub mod context;
pub mod gateway;
