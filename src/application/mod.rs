pub mod debounce;
pub mod service;
