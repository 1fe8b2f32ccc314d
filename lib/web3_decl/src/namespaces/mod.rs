pub use self::{eth::EthNamespaceClient, zks::ZksNamespaceClient};

mod eth;
mod zks;
