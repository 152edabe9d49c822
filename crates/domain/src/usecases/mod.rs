//! Application use cases / business logic

pub mod publish_state;

pub use publish_state::{HashProductError, PublishStateUpdater, get_top_level_product};
