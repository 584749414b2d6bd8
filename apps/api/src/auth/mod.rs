// Email/password accounts with stateless HS256 bearer tokens.
// `AuthUser` is the extractor that protected handlers take as an argument.

pub mod extractor;
pub mod handlers;
pub mod token;
pub mod users;

pub use extractor::AuthUser;
