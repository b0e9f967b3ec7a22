//! Chatbot reply logic. Currently a plain echo; the HTTP layer owns request
//! validation.

/// Build the chatbot reply for a user message.
pub fn reply(message: &str) -> String {
    format!("You said: {message}")
}
