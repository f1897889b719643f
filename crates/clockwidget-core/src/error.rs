//! 클록 위젯 핵심 에러 타입.
//!
//! 캡처 파이프라인(캔버스/플러시/셀렉터/스케줄러)과 어댑터가 공유한다.

use std::path::PathBuf;

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 드로잉 서피스/캔버스 생성 실패
    #[error("서피스 할당 실패: {0}")]
    AllocationFailed(String),

    /// 렌더 버퍼 접근 불가
    #[error("픽셀 버퍼 접근 실패: {0}")]
    PixelAccessFailed(String),

    /// 이미지 인코딩/쓰기 실패
    #[error("이미지 저장 실패 ({}): {reason}", path.display())]
    EncodeFailed {
        /// 대상 파일 경로
        path: PathBuf,
        /// 실패 사유
        reason: String,
    },

    /// 잘못된 인자 (세션/서피스 없음 등)
    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 결과(XML) 파싱 실패
    #[error("설정 결과 파싱 실패: {0}")]
    Settings(String),

    /// 키-값 저장소 접근 실패
    #[error("저장소 에러: {0}")]
    Store(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
