pub mod decimal;
pub mod hex_fmt;
pub mod result_ext;
pub mod time;

pub use result_ext::ResultExt;
