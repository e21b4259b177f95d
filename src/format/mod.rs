// Display formatting — relative comment times and guest-facing helpers.

pub mod countdown;
pub mod guest;
pub mod relative;
