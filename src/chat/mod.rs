pub mod composer;
pub mod room;
pub mod session;
pub mod store;

pub use composer::Composer;
pub use room::ChatRoom;
pub use session::RoomSession;
