mod new_subscriber;
mod subscriber_email;

pub use new_subscriber::NewSubscriber;
pub use subscriber_email::{EmailValidationError, SubscriberEmail, strip_control_characters};
