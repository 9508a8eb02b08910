//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, Anthropic, mock)
//! - `nlu` - language interpreters built on an AI provider
//! - `places` - venue search (Google Places, mock)
//! - `storage` - reservation session store
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod nlu;
pub mod places;
pub mod storage;
