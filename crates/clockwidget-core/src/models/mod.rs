//! 시계 위젯 도메인 모델.
//!
//! 서피스/픽셀 버퍼, 시계 표시 상태, 배경 정보, 요청/응답, 전원 상태.

pub mod background;
pub mod clock;
pub mod power;
pub mod request;
pub mod surface;
