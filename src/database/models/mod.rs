pub mod account;
pub mod token_record;

pub use account::{Account, NewAccount};
pub use token_record::TokenRecord;
