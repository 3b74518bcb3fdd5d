pub mod headless;
pub mod navigator;
pub mod retry;
pub mod session;

pub use headless::{ChromeLauncher, ChromeSession};
pub use navigator::Navigator;
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use session::{BrowserSession, SessionLauncher};
