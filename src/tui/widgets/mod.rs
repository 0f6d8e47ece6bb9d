mod messages;
mod status;

pub use messages::{MessageList, MessageListState, WAITING_TEXT};
pub use status::{Feedback, StatusBar};
