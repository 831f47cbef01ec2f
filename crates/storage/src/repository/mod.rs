pub mod account;
pub mod competition;
pub mod content;
pub mod location;
pub mod participant;
pub mod verification;
