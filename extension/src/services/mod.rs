// Browser platform bindings

pub mod dom;
pub mod js;
pub mod runtime;
pub mod storage;

pub use runtime::ChromeBackground;
pub use storage::{ChromeStorage, StorageSubscription};
