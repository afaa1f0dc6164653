pub mod agent;
pub mod llm;
pub mod schemes;
pub mod translate;
