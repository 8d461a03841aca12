pub mod client;
pub mod credentials;
pub mod errors;
pub mod google;
pub mod sheets;
pub mod table;
