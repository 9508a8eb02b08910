//! Language interpreter adapters.

mod llm_interpreter;
mod mock_interpreter;

pub use llm_interpreter::LlmInterpreter;
pub use mock_interpreter::MockInterpreter;
