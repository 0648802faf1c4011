pub mod document_flow;

pub use document_flow::{output_path_for, process_document, DocumentReport};
