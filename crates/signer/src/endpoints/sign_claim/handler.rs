//! /api/sign-claim ハンドラ実装

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use claim_crypto::{EthAddress, U256};
use claim_types::{AmountValue, SignClaimRequest, SignClaimResponse};

use crate::config::AppState;
use crate::error::SignerError;

/// /api/sign-claim エンドポイントハンドラ。
///
/// 検証済みの請求タプルを受け取り、検証側コントラクトが再構築できる
/// パック形式でハッシュし、EIP-191形式で署名して返す。
pub async fn handle_sign_claim(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SignClaimResponse>, SignerError> {
    let request = validate_request(&body)?;

    let amount = amount_to_u256(&request.amount)?;

    // アドレスの形式不正はパック段階の失敗として扱う
    let recipient: EthAddress = request
        .recipient
        .parse()
        .map_err(|e| SignerError::Signing(format!("recipientのデコードに失敗: {e}")))?;

    let signature = claim_crypto::sign_claim(
        &state.signing_key,
        &request.user_id,
        &recipient,
        &amount,
        &request.raw_claim_id,
    )
    .map_err(|e| SignerError::Signing(e.to_string()))?;

    let signature_hex = signature.to_hex();
    tracing::info!(
        user_id = %request.user_id,
        recipient = %recipient,
        amount = %amount,
        raw_claim_id = %request.raw_claim_id,
        signature = %signature_hex,
        "署名を生成しました"
    );

    Ok(Json(SignClaimResponse {
        signature: signature_hex,
    }))
}

/// リクエストボディの必須フィールドを検証し、型付きリクエストに変換する。
/// 欠落・null・空文字列のフィールドをまとめて報告する。
fn validate_request(body: &serde_json::Value) -> Result<SignClaimRequest, SignerError> {
    const REQUIRED_FIELDS: [&str; 4] = ["userId", "recipient", "amount", "rawClaimId"];

    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| is_absent(body.get(*field)))
        .collect();

    if !missing.is_empty() {
        return Err(SignerError::BadRequest(format!(
            "必須パラメータが不足しています: {}",
            missing.join(", ")
        )));
    }

    // 型不一致（amountの負数・小数等）はここで拒否される
    serde_json::from_value(body.clone())
        .map_err(|e| SignerError::BadRequest(format!("リクエストの形式が不正です: {e}")))
}

/// フィールドが欠落・null・空文字列のいずれかであるか。
fn is_absent(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// amountフィールドをU256に変換する。
fn amount_to_u256(amount: &AmountValue) -> Result<U256, SignerError> {
    match amount {
        AmountValue::Integer(value) => Ok(U256::from(*value)),
        AmountValue::Text(text) => {
            claim_crypto::parse_amount(text).map_err(|e| SignerError::BadRequest(e.to_string()))
        }
    }
}
