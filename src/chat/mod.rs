// The three user actions: list models, generate, clear history.
// Each call is independent; the selected model is always passed in.

mod service;

pub use service::{ChatService, GenerateParams, Generation};
