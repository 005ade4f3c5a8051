pub mod composer;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod transport;
