pub mod client;
pub mod model;
pub mod persister;
pub mod printer;
pub mod procedure;
pub mod requests;
