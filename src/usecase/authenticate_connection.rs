//! UseCase: 接続への identity 宣言処理
//!
//! トークン検証は外部の identity コラボレータ（TokenVerifier）へ委譲し、
//! 成功した場合のみ接続に identity をタグ付けする。検証に失敗しても
//! 接続はレジストリに残り、閲覧は継続できる。

use std::sync::Arc;

use crate::domain::{ConnectionId, PushError, TokenVerifier, UpdatePusher, Username};

use super::error::AuthenticateError;

/// 接続認証のユースケース
pub struct AuthenticateConnectionUseCase {
    /// TokenVerifier（identity コラボレータの抽象化）
    verifier: Arc<dyn TokenVerifier>,
    /// UpdatePusher（接続レジストリの所有者）
    pusher: Arc<dyn UpdatePusher>,
}

impl AuthenticateConnectionUseCase {
    /// 新しい AuthenticateConnectionUseCase を作成
    pub fn new(verifier: Arc<dyn TokenVerifier>, pusher: Arc<dyn UpdatePusher>) -> Self {
        Self { verifier, pusher }
    }

    /// identity 宣言を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 宣言元の接続 ID
    /// * `token` - ビューアが提示したトークン
    ///
    /// # Returns
    ///
    /// * `Ok(Username)` - 検証成功、接続は authenticated 状態になる
    /// * `Err(AuthenticateError)` - 検証失敗、接続の登録状態は変わらない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        token: &str,
    ) -> Result<Username, AuthenticateError> {
        let claims = self
            .verifier
            .verify(token)
            .await
            .map_err(|_| AuthenticateError::InvalidToken)?;

        let username = claims.username.clone();
        self.pusher
            .set_identity(connection_id, claims.user_id, claims.username)
            .await
            .map_err(|e| match e {
                PushError::ConnectionNotFound(id) => AuthenticateError::ConnectionNotFound(id),
            })?;

        tracing::info!(
            "Connection '{}' authenticated as '{}'",
            connection_id,
            username
        );
        Ok(username)
    }
}
