pub mod add_bookmark;
pub mod bookmark_list;
pub mod navbar;

pub use add_bookmark::AddBookmarkForm;
pub use bookmark_list::{BookmarkList, DeleteError};
pub use navbar::Navbar;
