//! 이벤트 관리를 위한 도메인 모델.

mod attendee;
mod event;
mod user;

pub use attendee::*;
pub use event::*;
pub use user::*;
