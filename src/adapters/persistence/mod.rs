pub mod screenshot_store;

pub use screenshot_store::FsImageStore;
