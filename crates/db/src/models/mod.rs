pub mod bookmark;
pub mod session;
pub mod user;

pub use bookmark::Bookmark;
pub use session::Session;
pub use user::User;
