//! # 設定・共有状態
//!
//! 環境変数からの設定読み込みとサービスの共有状態の定義。

use anyhow::Context;
use claim_crypto::{EthAddress, Secp256k1SigningKey};

/// デフォルトのリッスンポート
const DEFAULT_PORT: u16 = 3001;

/// 環境変数から読み込むサービス設定。
pub struct SignerConfig {
    /// 署名用secp256k1秘密鍵
    pub signing_key: Secp256k1SigningKey,
    /// リッスンポート
    pub port: u16,
}

impl SignerConfig {
    /// 環境変数から設定を構築する。
    ///
    /// - `VERIFIER_PRIVATE_KEY`（必須）: 32バイトの16進数秘密鍵（0xプレフィックス省略可）。
    ///   未設定・不正な場合はエラーを返し、プロセスは起動しない。
    /// - `PORT`（省略可）: リッスンポート。デフォルトは3001。
    pub fn from_env() -> anyhow::Result<Self> {
        let key_hex = std::env::var("VERIFIER_PRIVATE_KEY")
            .context("環境変数 VERIFIER_PRIVATE_KEY が設定されていません")?;
        let signing_key = claim_crypto::signing_key_from_hex(&key_hex)
            .context("VERIFIER_PRIVATE_KEY のパースに失敗しました")?;

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT のパースに失敗しました: {value}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { signing_key, port })
    }
}

/// サービスの共有状態。
/// 署名鍵は起動時に一度だけ構築され、以後変更されない。
/// 鍵そのものはログにもレスポンスにも出力しない。
pub struct AppState {
    /// 署名用secp256k1秘密鍵
    pub signing_key: Secp256k1SigningKey,
    /// 署名鍵から導出されたEthereumアドレス
    pub signer_address: EthAddress,
}

impl AppState {
    /// 署名鍵から共有状態を構築する。
    pub fn new(signing_key: Secp256k1SigningKey) -> Self {
        let signer_address = claim_crypto::signer_address(&signing_key);
        Self {
            signing_key,
            signer_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// 環境変数の有無によるfrom_envの成否を確認する。
    /// 環境変数はプロセス全体で共有されるため、1テストに直列化している。
    #[test]
    fn test_from_env() {
        std::env::remove_var("VERIFIER_PRIVATE_KEY");
        std::env::remove_var("PORT");
        assert!(SignerConfig::from_env().is_err());

        std::env::set_var("VERIFIER_PRIVATE_KEY", TEST_PRIVATE_KEY);
        let config = SignerConfig::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);

        std::env::set_var("PORT", "8080");
        assert_eq!(SignerConfig::from_env().unwrap().port, 8080);

        std::env::set_var("PORT", "not-a-port");
        assert!(SignerConfig::from_env().is_err());

        std::env::set_var("PORT", "8080");
        std::env::set_var("VERIFIER_PRIVATE_KEY", "garbage");
        assert!(SignerConfig::from_env().is_err());

        std::env::remove_var("VERIFIER_PRIVATE_KEY");
        std::env::remove_var("PORT");
    }
}
