mod corpus_store;
mod secret_store;
mod text_generator;

pub use corpus_store::{ICorpusStore, IStoreConnector};
pub use secret_store::ISecretStore;
pub use text_generator::{IGeneratorFactory, ITextGenerator};
