pub mod echo;
pub mod engine;
pub mod notifier;
pub mod requester;
pub mod selector;

pub use crate::domain::model::{
    Band, Formatting, Greeting, GreetingContext, OutboundMessage, RunReport, StepOutcome,
};
pub use crate::domain::ports::{Messenger, TextGenerator};
pub use crate::utils::error::Result;
