pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use rest::{
    contact_methods_handler, generate_content_handler, health_handler, process_voice_handler,
    share_results_handler, submit_answers_handler,
};
