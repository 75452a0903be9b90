//! # サービスエラー型
//!
//! 全エンドポイントで共通のエラー型。

use axum::http::StatusCode;
use axum::Json;
use claim_types::ErrorResponse;

/// 署名サービスのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// 不正なリクエスト（必須パラメータの不足、amountの形式不正）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 署名処理の失敗（アドレスのデコード失敗、ECDSA署名の失敗）
    #[error("署名処理に失敗: {0}")]
    Signing(String),
}

impl axum::response::IntoResponse for SignerError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SignerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SignerError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "リクエスト処理に失敗しました");
        } else {
            tracing::warn!(%status, error = %message, "不正なリクエストを拒否しました");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
