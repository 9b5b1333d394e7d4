pub mod messages;
pub mod sender;

pub use messages::EmailMessage;
pub use sender::LogEmailSender;
