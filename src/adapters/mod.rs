// Concrete implementations of the outbound ports.

pub mod gemini;

pub use gemini::GeminiModel;
