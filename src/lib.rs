//! 统一的 LLM Provider 接口 支持按 id 或使用场景查找 Provider

pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod provider;
pub mod registry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::LLMError;
pub use factory::ProviderFactory;
pub use provider::{DynProvider, LLMProvider, merge_options};
pub use registry::ProviderRegistry;
pub use types::*;
