//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `serve`  | `Serve`          |
//! | `board`  | `Board`          |
//! | `config` | `Config`         |

pub mod board;
pub mod config;
pub mod serve;

pub use board::{Backend, cmd_board};
pub use config::cmd_config;
pub use serve::cmd_serve;
