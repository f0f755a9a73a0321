// Adapters layer: reqwest clients for the external collaborators.

pub mod gemini;
pub mod telegram;

pub use gemini::GeminiClient;
pub use telegram::TelegramClient;
