pub mod chat_error;
pub mod chat_stream;
pub mod config;
pub mod message;
pub mod session;
pub mod transcript;
pub mod turn;
