pub mod account;
pub mod common;
pub mod competition;
pub mod history;
pub mod location;
