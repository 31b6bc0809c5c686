pub mod api_client;
pub mod token_codec;
pub mod token_storage;
pub mod entrega_flow;
pub mod integrity_check;
pub mod encryption_check;

#[cfg(test)]
pub(crate) mod fake_gateway;

pub use api_client::{ApiClient, GatewayApi};
pub use token_storage::{LocalTokenStorage, TokenStorage};

#[cfg(test)]
pub use token_storage::MemoryTokenStorage;
