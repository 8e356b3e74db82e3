pub mod backup;
pub mod settings;
pub mod store;
