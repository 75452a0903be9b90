//! # /api/sign-claim エンドポイント
//!
//! ## 処理フロー
//! 1. 必須フィールド（userId, recipient, amount, rawClaimId）の存在検証
//! 2. amountをuint256に、recipientを20バイトアドレスにデコード
//! 3. 検証側コントラクトと同一のパック形式でハッシュし、EIP-191形式で署名
//! 4. 0xプレフィックス付き65バイト署名を返却
//!
//! 呼び出し元の認証と請求の正当性検証は上流のワークフローで完了している前提。

mod handler;


pub use handler::handle_sign_claim;
