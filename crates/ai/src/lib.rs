//! `intake-ai`
//!
//! **Responsibility:** text generation boundary.
//!
//! - Builds the confirmation prompt for a new product.
//! - Calls the Gemini `generateContent` API.
//! - Turns every failure into [`Generation::Fallback`]; callers never see an error.

pub mod gemini;
pub mod prompt;
pub mod result;

pub use gemini::{GEMINI_BASE_URL, GeminiClient, GeminiConfig};
pub use prompt::confirmation_prompt;
pub use result::{FALLBACK_MESSAGE, Generation, GenerationError, TextGenerator};
