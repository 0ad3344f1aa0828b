// Authentication: Argon2id password verifiers, HS256 bearer tokens and the
// `AuthUser` / `PremiumUser` extractors that guard user-scoped routes.

pub mod credentials;
pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;

pub use extractor::{AuthUser, PremiumUser};
pub use token::TokenKeys;
