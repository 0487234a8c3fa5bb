pub mod grant;

pub use grant::{RefreshedGrant, TokenGrant};
