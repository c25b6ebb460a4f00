pub mod audio;
pub mod content_llm;
pub mod email;
pub mod memory_store;
pub mod sms;
pub mod tts;

pub use audio::FileAudioStore;
pub use content_llm::OpenAiContentAdapter;
pub use email::SendGridEmailAdapter;
pub use memory_store::MemoryStore;
pub use sms::TwilioSmsAdapter;
pub use tts::OpenAiTtsAdapter;
