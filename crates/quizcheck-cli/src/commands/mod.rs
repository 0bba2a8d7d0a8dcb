pub mod bookmarks;
pub mod categories;
pub mod grade;
pub mod init;
pub mod play;
pub mod review;
pub mod validate;
