//! # Claim Signer 暗号処理
//!
//! 請求タプル（userId, recipient, amount, claimIdHash）のパック・ハッシュ・
//! 署名を実装する。パック形式は検証側Solidityコントラクトの
//! `abi.encodePacked(string, address, uint256, bytes32)` とビット単位で
//! 一致する必要があり、このクレートの唯一の正当性条件となる。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | ハッシュ | keccak256 |
//! | 署名 | secp256k1 ECDSA（リカバリID付き、RFC 6979決定性ノンス） |
//! | メッセージ形式 | EIP-191 personal message（32バイトハッシュ用プレフィックス） |

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

pub use k256::ecdsa::SigningKey as Secp256k1SigningKey;
pub use primitive_types::U256;

/// EIP-191 personal messageプレフィックス（32バイトハッシュ用）。
/// 生のトランザクション署名と署名済みメッセージを分離する名前空間。
const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// 秘密鍵のデコード失敗
    #[error("秘密鍵が不正です: {0}")]
    InvalidPrivateKey(String),
    /// アドレスのデコード失敗
    #[error("アドレスが不正です: {0}")]
    InvalidAddress(String),
    /// amountのパース失敗
    #[error("amountが不正です: {0}")]
    InvalidAmount(String),
    /// ECDSA署名の生成失敗
    #[error("署名の生成に失敗しました")]
    SigningFailed,
    /// 署名からの公開鍵復元失敗
    #[error("署名者の復元に失敗しました")]
    RecoveryFailed,
}

// ---------------------------------------------------------------------------
// 基本型
// ---------------------------------------------------------------------------

/// 20バイトのEthereumアドレス。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    /// 生の20バイトから構築する。
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// 生のバイト列を返す。
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl std::str::FromStr for EthAddress {
    type Err = CryptoError;

    /// 0xプレフィックス付き（省略可）40桁16進数からパースする。
    /// チェックサム形式の検証は行わない（大文字小文字は区別しない）。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| CryptoError::InvalidAddress(format!("16進数のデコードに失敗: {e}")))?;
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidAddress("アドレスは20バイトである必要があります".into())
        })?;
        Ok(Self(arr))
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// リカバリID付きECDSA署名（65バイト、r || s || v形式）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSignature {
    /// r成分（32バイト）
    pub r: [u8; 32],
    /// s成分（32バイト、low-s正規化済み）
    pub s: [u8; 32],
    /// リカバリID（27または28、Ethereum慣習）
    pub v: u8,
}

impl ClaimSignature {
    /// 65バイトのバイト列（r || s || v）に変換する。
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// 0xプレフィックス付き130桁16進数文字列に変換する。
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

// ---------------------------------------------------------------------------
// ハッシュ・鍵・アドレス
// ---------------------------------------------------------------------------

/// keccak256ハッシュ計算。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// 16進数文字列（0xプレフィックス省略可）から署名鍵を構築する。
pub fn signing_key_from_hex(hex_str: &str) -> Result<Secp256k1SigningKey, CryptoError> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(digits)
        .map_err(|e| CryptoError::InvalidPrivateKey(format!("16進数のデコードに失敗: {e}")))?;
    let arr: [u8; 32] = bytes.try_into().map_err(|_| {
        CryptoError::InvalidPrivateKey("秘密鍵は32バイトである必要があります".into())
    })?;
    Secp256k1SigningKey::from_bytes((&arr).into()).map_err(|_| {
        CryptoError::InvalidPrivateKey("secp256k1の有効なスカラーではありません".into())
    })
}

/// 署名鍵からEthereumアドレスを導出する。
pub fn signer_address(signing_key: &Secp256k1SigningKey) -> EthAddress {
    address_from_pubkey(signing_key.verifying_key())
}

/// 公開鍵からEthereumアドレスを導出する。
/// 非圧縮公開鍵（0x04プレフィックスを除く64バイト）のkeccak256の下位20バイト。
fn address_from_pubkey(public_key: &VerifyingKey) -> EthAddress {
    let point = public_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    EthAddress(address)
}

/// amount文字列をU256にパースする。
/// 10進数と0xプレフィックス付き16進数を受理し、
/// 負数・小数・256ビットを超える値は拒否する。
pub fn parse_amount(text: &str) -> Result<U256, CryptoError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CryptoError::InvalidAmount("空文字列です".into()));
    }
    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return U256::from_str_radix(digits, 16)
            .map_err(|e| CryptoError::InvalidAmount(format!("16進数としてパースできません: {e}")));
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| CryptoError::InvalidAmount(format!("10進数としてパースできません: {e}")))
}

// ---------------------------------------------------------------------------
// 請求タプルのパックと署名
// ---------------------------------------------------------------------------

/// rawClaimIdをbytes32に変換する（UTF-8バイト列のkeccak256）。
pub fn claim_id_hash(raw_claim_id: &str) -> [u8; 32] {
    keccak256(raw_claim_id.as_bytes())
}

/// 請求タプルをパックする。
///
/// 検証側コントラクトの `abi.encodePacked(string, address, uint256, bytes32)`
/// と同一のバイト列を生成する:
/// - userId: UTF-8バイト列（パディング・長さプレフィックスなし）
/// - recipient: 生の20バイト
/// - amount: 32バイトビッグエンディアン
/// - claimIdHash: 生の32バイト
pub fn encode_claim(
    user_id: &str,
    recipient: &EthAddress,
    amount: &U256,
    claim_id_hash: &[u8; 32],
) -> Vec<u8> {
    let mut amount_bytes = [0u8; 32];
    amount.to_big_endian(&mut amount_bytes);

    let mut packed = Vec::with_capacity(user_id.len() + 20 + 32 + 32);
    packed.extend_from_slice(user_id.as_bytes());
    packed.extend_from_slice(recipient.as_bytes());
    packed.extend_from_slice(&amount_bytes);
    packed.extend_from_slice(claim_id_hash);
    packed
}

/// パック済み請求のメッセージハッシュ（keccak256）を計算する。
pub fn claim_message_hash(
    user_id: &str,
    recipient: &EthAddress,
    amount: &U256,
    claim_id_hash: &[u8; 32],
) -> [u8; 32] {
    keccak256(&encode_claim(user_id, recipient, amount, claim_id_hash))
}

/// EIP-191 personal messageハッシュを計算する。
/// 32バイトハッシュにプレフィックスを前置して再ハッシュする。
pub fn eth_signed_message_hash(message_hash: &[u8; 32]) -> [u8; 32] {
    let mut prefixed = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    prefixed.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    prefixed.extend_from_slice(message_hash);
    keccak256(&prefixed)
}

/// 32バイトハッシュにリカバリID付きECDSA署名を行う。
/// RFC 6979決定性ノンスを使用するため、同一入力からは常に同一署名が得られる。
pub fn sign_recoverable(
    signing_key: &Secp256k1SigningKey,
    prehash: &[u8; 32],
) -> Result<ClaimSignature, CryptoError> {
    let (sig, recovery_id) = signing_key
        .sign_prehash_recoverable(prehash)
        .map_err(|_| CryptoError::SigningFailed)?;

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    Ok(ClaimSignature {
        r,
        s,
        v: recovery_id.to_byte() + 27,
    })
}

/// 請求タプルの署名を生成する。
///
/// 1. claimIdHash = keccak256(rawClaimId)
/// 2. messageHash = keccak256(パック済みバイト列)
/// 3. EIP-191プレフィックスを前置して再ハッシュ
/// 4. リカバリID付きECDSA署名（r || s || v）
pub fn sign_claim(
    signing_key: &Secp256k1SigningKey,
    user_id: &str,
    recipient: &EthAddress,
    amount: &U256,
    raw_claim_id: &str,
) -> Result<ClaimSignature, CryptoError> {
    let id_hash = claim_id_hash(raw_claim_id);
    let message_hash = claim_message_hash(user_id, recipient, amount, &id_hash);
    let eth_hash = eth_signed_message_hash(&message_hash);
    sign_recoverable(signing_key, &eth_hash)
}

/// 署名から署名者のEthereumアドレスを復元する。
/// prehashはEIP-191プレフィックス適用後のハッシュ。
pub fn recover_signer(
    prehash: &[u8; 32],
    signature: &ClaimSignature,
) -> Result<EthAddress, CryptoError> {
    let recovery_byte = match signature.v {
        0 | 27 => 0u8,
        1 | 28 => 1u8,
        _ => return Err(CryptoError::RecoveryFailed),
    };
    let recovery_id =
        RecoveryId::try_from(recovery_byte).map_err(|_| CryptoError::RecoveryFailed)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| CryptoError::RecoveryFailed)?;

    let recovered = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered))
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
