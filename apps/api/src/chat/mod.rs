// Career chat and counseling. Conversation history lives in Redis, keyed by
// conversation id; nothing is held in process memory between requests.

pub mod handlers;
pub mod history;
pub mod prompts;
pub mod resources;
pub mod service;
