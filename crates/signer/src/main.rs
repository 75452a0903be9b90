//! # Claim Signer サービス
//!
//! 上流で検証済みの請求タプルに対してEthereum互換の署名を発行するHTTPサービス。
//! 発行した署名は、同一のパック形式を再構築する検証側コントラクトが
//! ecrecoverで署名者アドレスを確認することで検証される。
//!
//! ## API エンドポイント
//! - `POST /api/sign-claim`: 請求タプル（userId, recipient, amount, rawClaimId）への署名発行
//! - `GET /api/signer-info`: 署名者アドレスの公開
//!
//! ## 起動シーケンス
//! 1. 環境変数から秘密鍵を読み込む（未設定の場合は起動せず異常終了）
//! 2. 署名者アドレスを導出してログに出力
//! 3. HTTPサーバーを起動

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use crate::config::{AppState, SignerConfig};

/// APIルーターを構築する。
fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/sign-claim",
            axum::routing::post(endpoints::handle_sign_claim),
        )
        .route(
            "/api/signer-info",
            axum::routing::get(endpoints::handle_signer_info),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = SignerConfig::from_env()?;

    let state = Arc::new(AppState::new(config.signing_key));
    tracing::info!(signer_address = %state.signer_address, "署名者アドレスを導出しました");

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("署名サービスを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// HTTP経由の結合テスト
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// テスト用の固定秘密鍵（Hardhatの開発用アカウント#0）
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// 実ルーターをエフェメラルポートで起動し、ベースURLを返す。
    async fn start_test_server() -> String {
        let signing_key = claim_crypto::signing_key_from_hex(TEST_PRIVATE_KEY).unwrap();
        let state = Arc::new(AppState::new(signing_key));
        let app = router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        format!("http://127.0.0.1:{port}")
    }

    /// 正常リクエストが200と署名を返すことをHTTP経由で確認
    #[tokio::test]
    async fn test_http_sign_claim_ok() {
        let base = start_test_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/sign-claim"))
            .json(&serde_json::json!({
                "userId": "user123",
                "recipient": "0x0000000000000000000000000000000000dEaD",
                "amount": "1000000000000000000",
                "rawClaimId": "claim-abc-001",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        let signature = body["signature"].as_str().unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 132);
    }

    /// 欠落フィールドが400とエラーボディを返すことをHTTP経由で確認
    #[tokio::test]
    async fn test_http_sign_claim_missing_field() {
        let base = start_test_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/sign-claim"))
            .json(&serde_json::json!({
                "recipient": "0x0000000000000000000000000000000000dEaD",
                "amount": "1000",
                "rawClaimId": "claim-abc-001",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("userId"));
    }

    /// 形式不正なrecipientが500を返すことをHTTP経由で確認
    #[tokio::test]
    async fn test_http_sign_claim_bad_recipient() {
        let base = start_test_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/api/sign-claim"))
            .json(&serde_json::json!({
                "userId": "user123",
                "recipient": "0x1234",
                "amount": "1000",
                "rawClaimId": "claim-abc-001",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    /// signer-infoが署名者アドレスを返すことをHTTP経由で確認
    #[tokio::test]
    async fn test_http_signer_info() {
        let base = start_test_server().await;

        let response = reqwest::get(format!("{base}/api/signer-info")).await.unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body["address"].as_str().unwrap(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }
}
