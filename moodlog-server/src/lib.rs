pub mod echo;
pub mod error;
pub mod http;
pub mod logging;
pub mod page;
