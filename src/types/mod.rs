//! Domain types: accounts, stored credentials and bearer tokens.

pub mod account;
pub mod credential;
pub mod token;

pub use account::{Account, AccountRole};
pub use credential::Credential;
pub use token::{Token, TokenIssuer};
