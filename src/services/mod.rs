pub mod extract;
pub mod generator;
pub mod llm;
pub mod outline;
