pub mod cookies;
pub mod file;
pub mod memory;

pub use cookies::{Cookie, FileCookieJar};
pub use file::FileStorage;
pub use memory::{MemoryCookieJar, MemoryStorage};
