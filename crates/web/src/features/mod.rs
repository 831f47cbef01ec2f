pub mod accounts;
pub mod competitions;
pub mod content;
pub mod locations;
