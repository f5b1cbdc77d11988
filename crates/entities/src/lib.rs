#![forbid(unsafe_code)]

pub mod bookmark;
pub mod change;
pub mod token;
pub mod user;
pub mod validation;

pub use bookmark::{Bookmark, NewBookmark};
pub use change::{ChangeEvent, ChangeKind, RowKey};
pub use token::{SignInRequest, Token};
pub use user::User;
pub use validation::ValidationError;
