//! # Order Service 設定
//!
//! 環境変数から Order Service サーバーの設定を読み込む。
//!
//! | 変数名 | 既定値 | 説明 |
//! |--------|--------|------|
//! | `ORDERDESK_HOST` | `0.0.0.0` | バインドアドレス |
//! | `ORDERDESK_PORT` | `3000` | ポート番号 |
//! | `DATABASE_URL` | - | PostgreSQL 接続 URL（指定時は `DB_*` より優先） |
//! | `DB_HOST` / `DB_PORT` | `localhost` / `5432` | DB ホスト・ポート |
//! | `DB_USER` / `DB_PASSWORD` / `DB_NAME` | - / 空 / - | 認証情報・データベース名 |
//! | `DB_MAX_CONNECTIONS` | `5` | プールの最大接続数 |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `5` | 接続取得の待ち時間上限（秒） |
//! | `REQUEST_TIMEOUT_SECS` | `30` | リクエスト処理のタイムアウト（秒） |

use std::{env, str::FromStr, time::Duration};

use orderdesk_infra::db::{ConnectionTarget, DatabaseConfig};
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません（DATABASE_URL を使わない場合は必須です）")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Order Service サーバーの設定
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// データベース接続設定
    pub database:        DatabaseConfig,
    /// リクエスト処理のタイムアウト（超過時は 408）
    pub request_timeout: Duration,
}

impl OrderConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストでプロセスの環境変数を書き換えずに済むよう、参照元を差し替えられる。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let target = match lookup("DATABASE_URL") {
            Some(url) => ConnectionTarget::Url(url),
            None => ConnectionTarget::Params {
                host:     lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port:     parse_or(&lookup, "DB_PORT", 5432)?,
                user:     lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
            },
        };

        Ok(Self {
            host: lookup("ORDERDESK_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "ORDERDESK_PORT", 3000)?,
            database: DatabaseConfig {
                target,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    5,
                )?),
            },
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
