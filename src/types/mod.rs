pub mod note;
pub mod section;
pub mod template;
pub mod warning;
