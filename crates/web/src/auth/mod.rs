pub mod tokens;

pub use tokens::{TokenService, TokenType};
