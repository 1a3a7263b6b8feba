//! Identity resolution

mod identity;
mod jwt;

pub use identity::{IdentityResolver, UnconfiguredIdentity};
pub use jwt::{Claims, JwtService};
