pub mod fs_storage;
pub mod index_store;
