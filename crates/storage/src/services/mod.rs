pub mod history;
pub mod image;
pub mod password;
pub mod ranking;
pub mod verification_code;
