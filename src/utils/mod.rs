pub mod clock;
pub mod dir;
pub mod id;
pub mod level;
pub mod logging;
pub mod time;
