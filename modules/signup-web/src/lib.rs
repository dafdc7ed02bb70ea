pub mod controller;
pub mod events;
pub mod messages;
pub mod page;
pub mod server;
pub mod session;
pub mod templates;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use controller::ViewController;
pub use events::UiEvent;
pub use page::{ActivityDraft, ListState, Page, ViewMode};
pub use session::Session;
