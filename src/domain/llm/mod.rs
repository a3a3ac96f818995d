//! Language model domain models and traits

mod message;
mod provider;

pub use message::{Message, MessageRole};
pub use provider::LanguageModel;

#[cfg(test)]
pub use provider::mock::MockLanguageModel;
