//! API key resolution.

pub mod env;

pub use env::{API_KEY_VARS, load_dotenv, resolve_api_key};
