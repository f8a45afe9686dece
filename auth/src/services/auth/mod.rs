pub mod jwt;
pub mod login;
pub mod token_issuer;
