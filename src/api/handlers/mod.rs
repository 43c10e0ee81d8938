pub mod admin;
pub mod dnevnik;
pub mod health;
pub mod login;
