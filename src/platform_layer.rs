pub mod console;
pub mod error;
pub mod types;

pub use console::ConsolePlatform;
pub use types::{
    AppEvent, MessageSeverity, PlatformCommand, PlatformEventHandler, RowDataSource,
    RowDescriptor,
};
