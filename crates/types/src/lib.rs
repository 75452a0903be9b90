//! # Claim Signer 共有型定義
//!
//! HTTP APIのリクエスト/レスポンスをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - アドレス: 0xプレフィックス付き16進数（20バイト）
//! - 署名: 0xプレフィックス付き16進数（65バイト、r || s || v）
//! - amount: 10進数文字列、0xプレフィックス付き16進数文字列、またはJSON整数

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /api/sign-claim リクエスト/レスポンス
// ---------------------------------------------------------------------------

/// /api/sign-claim リクエスト。
///
/// 4フィールドすべて必須。欠落・null・空文字列の検出はハンドラ側で
/// 行うため、この構造体へのデシリアライズは存在確認の後に実行される。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignClaimRequest {
    /// 請求ユーザーの識別子
    pub user_id: String,
    /// 受取先のEthereumアドレス（0xプレフィックス付き16進数）
    pub recipient: String,
    /// 請求額（uint256相当）
    pub amount: AmountValue,
    /// 請求の生識別子。keccak256でbytes32に変換される
    pub raw_claim_id: String,
}

/// amountフィールドの表現。JSON整数と文字列の両方を受理する。
/// 負数・小数はデシリアライズの時点で拒否される。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    /// JSON整数（u64に収まる範囲）
    Integer(u64),
    /// 10進数または0xプレフィックス付き16進数の文字列
    Text(String),
}

/// /api/sign-claim レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignClaimResponse {
    /// 0xプレフィックス付き65バイト署名（r || s || v）
    pub signature: String,
}

// ---------------------------------------------------------------------------
// /api/signer-info レスポンス
// ---------------------------------------------------------------------------

/// /api/signer-info レスポンス。
/// 検証側コントラクトの運用者が期待する署名者アドレスを設定する際に参照する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerInfo {
    /// 署名鍵から導出されたEthereumアドレス（0xプレフィックス付き16進数）
    pub address: String,
}

// ---------------------------------------------------------------------------
// エラーレスポンス
// ---------------------------------------------------------------------------

/// 全エンドポイント共通のエラーレスポンスボディ。
/// 呼び出し元に返す内容は簡潔に保ち、秘密情報やスタックトレースは含めない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラー内容の説明
    pub error: String,
}
