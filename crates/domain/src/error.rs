//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成やリクエスト検証で発生するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | [`DomainError::Validation`] | 400 Bad Request | 単一の値の検証失敗 |
//! | [`ValidationErrors`] | 400 Bad Request | リクエスト全体の検証失敗（違反の一覧） |

use orderdesk_shared::Violation;
use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値オブジェクトの生成時に、入力がルールに違反している場合に使用する。
    /// メッセージはそのままクライアントへの違反メッセージになる。
    #[error("{0}")]
    Validation(String),
}

/// リクエスト検証で見つかった違反の一覧
///
/// パスパラメータとボディの全フィールドを評価した結果であり、
/// 最初の違反で打ち切らない。
#[derive(Debug, Clone, PartialEq, Error)]
#[error("入力値が不正です（{} 件）", .0.len())]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// 単一の違反からなる一覧を作成する
    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }

    /// 指定したパラメータ名の違反を含むか
    pub fn has_param(&self, param: &str) -> bool {
        self.0.iter().any(|v| v.param.as_deref() == Some(param))
    }
}
