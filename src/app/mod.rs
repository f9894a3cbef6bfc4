// Author: Dustin Pilgrim
// License: MIT

pub mod command;
pub mod input;
pub mod overlay;
pub mod session;
pub mod session_mode;
