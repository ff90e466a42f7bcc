mod header;
#[allow(clippy::module_inception)]
mod token;

pub use header::{Header, JWT_TYPE};
pub use token::Token;
