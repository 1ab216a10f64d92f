// Adapters layer: concrete implementations for external systems (files, model service, terminal).

pub mod console;
pub mod csv_input;
pub mod ollama;
pub mod report;
pub mod storage;
