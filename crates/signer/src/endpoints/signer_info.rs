//! # GET /api/signer-info
//!
//! 署名鍵から導出されたEthereumアドレスを公開する。
//! 検証側コントラクトの運用者が期待署名者を設定する際に参照する。
//! 秘密情報は含まれない。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use claim_types::SignerInfo;

use crate::config::AppState;

/// /api/signer-info エンドポイントハンドラ。
pub async fn handle_signer_info(State(state): State<Arc<AppState>>) -> Json<SignerInfo> {
    Json(SignerInfo {
        address: state.signer_address.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 固定鍵に対して既知のアドレスが返ることを確認
    #[tokio::test]
    async fn test_signer_info() {
        let signing_key = claim_crypto::signing_key_from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let state = Arc::new(AppState::new(signing_key));

        let info = handle_signer_info(State(state)).await.0;
        assert_eq!(info.address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }
}
