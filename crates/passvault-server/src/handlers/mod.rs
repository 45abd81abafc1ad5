pub mod client;
pub mod entry;
pub mod health;
pub mod key_part;
