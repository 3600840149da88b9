pub mod board;
pub mod session;

pub use board::{SeatBoard, SeatStatus};
pub use session::SeatSession;
