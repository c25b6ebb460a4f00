//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::FileAudioStore;
use crate::config::Config;
use lingualisten_core::ports::{ContentGenerationService, StorageService, TextToSpeechService};
use lingualisten_core::sharing::ShareDispatcher;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorageService>,
    pub content: Arc<dyn ContentGenerationService>,
    pub tts: Arc<dyn TextToSpeechService>,
    pub audio: Arc<FileAudioStore>,
    pub sharing: Arc<ShareDispatcher>,
    pub config: Arc<Config>,
}
