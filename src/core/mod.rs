// Author: Dustin Pilgrim
// License: MIT

pub mod error;
pub mod events;
pub mod info;
pub mod source;
pub mod timer;
pub mod visibility;

#[cfg(test)]
mod visibility_tests;
