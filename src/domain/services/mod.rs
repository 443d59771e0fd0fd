pub mod availability;
pub mod booking;
pub mod lifecycle;
pub mod slots;
pub mod time_blocks;
