// Resume versions: upload, review decision, download, delete.

pub mod handlers;
pub mod storage;
pub mod store;
pub mod upload;
