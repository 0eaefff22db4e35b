pub mod obscura_client;

pub use obscura_client::ObscuraClient;
