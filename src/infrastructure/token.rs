//! Static TokenVerifier 実装
//!
//! トークンの発行と検証は本来外部の identity コラボレータの責務。
//! この実装は起動時に渡されたトークン → identity の対応表を引くだけの
//! スタンドインであり、配線とテストに使用する。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{TokenClaims, TokenError, TokenVerifier};

/// 固定の対応表によるトークン検証
pub struct StaticTokenVerifier {
    /// Key: トークン文字列, Value: そのトークンが指す identity
    tokens: HashMap<String, TokenClaims>,
}

impl StaticTokenVerifier {
    /// 空の検証器を作成（全てのトークンが無効になる）
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    /// トークンと identity の対応を追加
    pub fn with_token(mut self, token: impl Into<String>, claims: TokenClaims) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }
}

impl Default for StaticTokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.tokens.get(token).cloned().ok_or(TokenError::Invalid)
    }
}
