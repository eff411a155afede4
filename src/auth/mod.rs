/// Authentication module
///
/// Password hashing, access token issue/validation, refresh token
/// lifecycle, Authorization header parsing and the per-request gate.

mod claims;
mod credentials;
mod gate;
mod jwt;
mod password;
mod refresh_token;

pub use claims::{access_token_lifetime, Claims, ACCESS_TOKEN_ISSUER};
pub use credentials::{extract_api_key, extract_bearer};
pub use gate::{
    authenticate_access, authenticate_api_key, require_admin, require_owner,
    AuthenticatedAccount, BearerToken, ServiceKey,
};
pub use jwt::{issue_access_token, issue_access_token_at, validate_access_token};
pub use password::{hash_password, verify_password, HASH_COST};
pub use refresh_token::{generate_refresh_token, refresh_token_lifetime, RefreshTokens};
