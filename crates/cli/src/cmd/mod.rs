mod info;
mod resolve;

pub use info::cmd_info;
pub use resolve::cmd_resolve;
