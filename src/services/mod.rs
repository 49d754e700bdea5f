pub mod file_service;
pub mod health_service;
pub mod room_service;
pub mod sweep_service;

pub use file_service::FileService;
pub use health_service::HealthService;
pub use room_service::RoomService;
pub use sweep_service::SweepService;
