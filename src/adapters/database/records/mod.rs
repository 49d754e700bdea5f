pub mod file;
pub mod room;

pub use file::FileRecord;
pub use room::RoomRecord;
