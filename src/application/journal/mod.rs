pub mod ai_service;

pub use ai_service::JournalAiService;
