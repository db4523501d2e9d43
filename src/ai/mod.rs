pub mod assistant;
pub mod chat;
pub mod detect;
pub mod pacer;
pub mod prompt;
#[cfg(test)]
pub(crate) mod testing;

pub use assistant::Assistant;
pub use chat::ChatService;
pub use detect::CategoryDetector;
pub use pacer::{Clock, SystemClock, TokenPacer, estimate_tokens};
