//! External collaborators: exchange market data and the language-model
//! advice endpoint.

pub mod binance;
pub mod openai;

pub use binance::BinanceClient;
pub use openai::OpenAiClient;
