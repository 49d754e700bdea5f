pub mod file;
pub mod room;

pub use file::StoredFile;
pub use room::Room;
