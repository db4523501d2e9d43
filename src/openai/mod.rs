mod core;

pub use self::core::{CompletionApi, CompletionOptions, Message, OpenAiClient, Role, completion};
