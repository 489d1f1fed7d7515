//! # 入力検証
//!
//! 宣言的な検証ルール（[`Rule`]）と、複数フィールドの違反を集約する
//! [`Validator`] を提供する。
//!
//! ## 評価モデル
//!
//! - フィールド間では短絡しない。パスパラメータとボディの全フィールドを評価し、
//!   違反をすべて収集する
//! - 1 フィールド内では最初に失敗したルールのみを報告する
//! - 違反が 1 件でもあれば DB アクセス前に 400 で拒否される
//!
//! ## 使用例
//!
//! ```rust
//! use orderdesk_domain::{customer::CustomerCode, validation::Validator};
//!
//! let mut v = Validator::new();
//! let code = v.path::<CustomerCode>("id", "C001");
//! assert!(code.is_none());
//! let errors = v.finish(|| code).unwrap_err();
//! assert!(errors.has_param("id"));
//! ```

use std::{str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use orderdesk_shared::Violation;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{DomainError, error::ValidationErrors};

/// JSON リクエストボディ（フラットなフィールド → 値のマップ）
pub type RequestBody = Map<String, Value>;

/// 受信したボディ
///
/// JSON オブジェクトとして解釈できなかった場合は `Err` に理由を持つ。
pub type BodyInput = Result<RequestBody, String>;

static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("正規表現が不正です"));

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").expect("正規表現が不正です"));

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3}(,[0-9]{3})+|[0-9]+)\.[0-9]{2}$").expect("正規表現が不正です")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("正規表現が不正です"));

/// 検証ルール
///
/// 文字数は `chars().count()` で数える。トリムは呼び出し側（値オブジェクト）の責務。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// ちょうど N 文字
    ExactLength(usize),
    /// min 以上 max 以下の文字数
    LengthBetween { min: usize, max: usize },
    /// 半角数字のみ（符号・小数点不可）
    DigitsOnly,
    /// 数値（符号・小数点可）
    Numeric,
    /// 金額（記号なし、小数点以下 2 桁必須、負数不可、3 桁区切りカンマ可）
    Currency,
    /// ISO 8601 の暦日（`YYYY-MM-DD`）
    IsoDate,
}

impl Rule {
    /// ルールを評価する
    ///
    /// 失敗時は `label` を主語にしたメッセージを返す。
    pub fn check(&self, label: &str, value: &str) -> Result<(), DomainError> {
        let ok = match self {
            Rule::ExactLength(n) => value.chars().count() == *n,
            Rule::LengthBetween { min, max } => (*min..=*max).contains(&value.chars().count()),
            Rule::DigitsOnly => DIGITS_ONLY.is_match(value),
            Rule::Numeric => NUMERIC.is_match(value),
            Rule::Currency => CURRENCY.is_match(value),
            Rule::IsoDate => {
                ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
        };

        if ok {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "{label}は{}",
                self.requirement()
            )))
        }
    }

    /// 複数ルールを順に評価し、最初の失敗を返す
    pub fn check_all(rules: &[Rule], label: &str, value: &str) -> Result<(), DomainError> {
        rules.iter().try_for_each(|rule| rule.check(label, value))
    }

    fn requirement(&self) -> String {
        match self {
            Rule::ExactLength(n) => format!(" {n} 文字である必要があります"),
            Rule::LengthBetween { min, max } => {
                format!(" {min} 〜 {max} 文字である必要があります")
            }
            Rule::DigitsOnly => "半角数字のみで指定する必要があります".to_string(),
            Rule::Numeric => "数値である必要があります".to_string(),
            Rule::Currency => {
                "記号なし・小数点以下 2 桁の 0 以上の金額である必要があります".to_string()
            }
            Rule::IsoDate => "ISO 8601 形式の日付（YYYY-MM-DD）である必要があります".to_string(),
        }
    }
}

/// JSON 値をルール評価用の文字列に変換する
///
/// 文字列はそのまま、数値は JSON 表現を文字列化する。
/// `null`・真偽値・配列・オブジェクトは受け付けない。
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 複数フィールドの検証結果を集約するコレクタ
///
/// 各メソッドは違反があれば内部に記録し `None` を返す。
/// 最後に [`finish`](Validator::finish) で結果を確定する。
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスパラメータを検証する
    pub fn path<T>(&mut self, param: &str, raw: &str) -> Option<T>
    where
        T: FromStr<Err = DomainError>,
    {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(DomainError::Validation(msg)) => {
                self.violations.push(Violation::field(
                    param,
                    msg,
                    Some(Value::String(raw.to_string())),
                ));
                None
            }
        }
    }

    /// ボディの解析結果を検証する
    ///
    /// 解析に失敗していれば `param` を持たない違反を記録し `None` を返す。
    /// その場合、フィールド単位の検証は行わない。
    pub fn body<'a>(&mut self, body: &'a BodyInput) -> Option<&'a RequestBody> {
        match body {
            Ok(map) => Some(map),
            Err(reason) => {
                self.reject(reason.clone());
                None
            }
        }
    }

    /// 必須のボディフィールドを検証する
    pub fn required<T>(&mut self, body: &RequestBody, param: &str) -> Option<T>
    where
        T: FromStr<Err = DomainError>,
    {
        match body.get(param) {
            Some(value) => self.present(param, value),
            None => {
                self.violations
                    .push(Violation::field(param, format!("{param} は必須です"), None));
                None
            }
        }
    }

    /// 任意のボディフィールドを検証する
    ///
    /// - 未指定: `Some(None)`（検証を通過）
    /// - 指定あり・妥当: `Some(Some(value))`
    /// - 指定あり・不正: `None`（違反を記録）
    pub fn optional<T>(&mut self, body: &RequestBody, param: &str) -> Option<Option<T>>
    where
        T: FromStr<Err = DomainError>,
    {
        match body.get(param) {
            Some(value) => self.present(param, value).map(Some),
            None => Some(None),
        }
    }

    /// 許可リストにないボディのキーを違反として記録する
    pub fn reject_unknown(&mut self, body: &RequestBody, allowed: &[&str]) {
        for (key, value) in body {
            if !allowed.contains(&key.as_str()) {
                self.violations.push(Violation::field(
                    key.clone(),
                    format!("{key} は更新できないフィールドです"),
                    Some(value.clone()),
                ));
            }
        }
    }

    /// フィールドに紐づかない違反を記録する
    pub fn reject(&mut self, msg: impl Into<String>) {
        self.violations.push(Violation::general(msg));
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// 検証結果を確定する
    ///
    /// 違反があれば全件を返す。違反がなければ `build` で検証済みの値を組み立てる。
    /// `build` の中では各フィールドの `Option` に `?` を使える。
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.violations.is_empty() {
            return Err(ValidationErrors::new(self.violations));
        }
        build().ok_or_else(|| {
            ValidationErrors::single(Violation::general("リクエストの検証に失敗しました"))
        })
    }

    fn present<T>(&mut self, param: &str, value: &Value) -> Option<T>
    where
        T: FromStr<Err = DomainError>,
    {
        let Some(text) = scalar_text(value) else {
            self.violations.push(Violation::field(
                param,
                format!("{param} は文字列または数値で指定する必要があります"),
                Some(value.clone()),
            ));
            return None;
        };

        match text.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(DomainError::Validation(msg)) => {
                self.violations
                    .push(Violation::field(param, msg, Some(value.clone())));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Rule::ExactLength(6), "C00001", true)]
    #[case(Rule::ExactLength(6), "C0001", false)]
    #[case(Rule::ExactLength(4), "日本語テ", true)]
    #[case(Rule::LengthBetween { min: 1, max: 3 }, "", false)]
    #[case(Rule::LengthBetween { min: 1, max: 3 }, "abc", true)]
    #[case(Rule::LengthBetween { min: 1, max: 3 }, "abcd", false)]
    #[case(Rule::DigitsOnly, "200100", true)]
    #[case(Rule::DigitsOnly, "+20010", false)]
    #[case(Rule::DigitsOnly, "2001.0", false)]
    #[case(Rule::DigitsOnly, "２００１", false)]
    #[case(Rule::Numeric, "200100", true)]
    #[case(Rule::Numeric, "-12", true)]
    #[case(Rule::Numeric, "+1.5", true)]
    #[case(Rule::Numeric, ".5", true)]
    #[case(Rule::Numeric, "1.", false)]
    #[case(Rule::Numeric, "12a", false)]
    #[case(Rule::Numeric, "", false)]
    #[case(Rule::Currency, "1000.00", true)]
    #[case(Rule::Currency, "1,000.00", true)]
    #[case(Rule::Currency, "0.00", true)]
    #[case(Rule::Currency, "1000", false)]
    #[case(Rule::Currency, "1000.5", false)]
    #[case(Rule::Currency, "-1000.00", false)]
    #[case(Rule::Currency, "$1000.00", false)]
    #[case(Rule::Currency, "1,00.00", false)]
    #[case(Rule::IsoDate, "2008-08-30", true)]
    #[case(Rule::IsoDate, "2008-02-30", false)]
    #[case(Rule::IsoDate, "2008-8-30", false)]
    #[case(Rule::IsoDate, "30/08/2008", false)]
    fn test_ruleの判定(#[case] rule: Rule, #[case] input: &str, #[case] expected: bool) {
        assert_eq!(rule.check("値", input).is_ok(), expected, "{rule:?} / {input:?}");
    }

    #[test]
    fn test_ruleの失敗メッセージはラベルを主語にする() {
        let err = Rule::ExactLength(6).check("顧客コード", "C1").unwrap_err();

        assert_eq!(
            err,
            DomainError::Validation("顧客コードは 6 文字である必要があります".to_string())
        );
    }

    #[test]
    fn test_check_allは最初の失敗のみを返す() {
        let err = Rule::check_all(&[Rule::ExactLength(6), Rule::DigitsOnly], "注文番号", "ab")
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "注文番号は 6 文字である必要があります"
        );
    }

    /// テスト用の値オブジェクト（3 文字ちょうど）
    #[derive(Debug, PartialEq)]
    struct Code3(String);

    impl FromStr for Code3 {
        type Err = DomainError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Rule::ExactLength(3).check("コード", s)?;
            Ok(Self(s.to_string()))
        }
    }

    fn body(value: Value) -> RequestBody {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_全フィールドの違反を収集する() {
        let mut sut = Validator::new();
        let body = body(json!({ "b": "toolong" }));

        let a = sut.path::<Code3>("a", "x");
        let b = sut.required::<Code3>(&body, "b");
        let c = sut.required::<Code3>(&body, "c");

        let errors = sut.finish(|| Some((a?, b?, c?))).unwrap_err();
        let violations = errors.violations();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].param.as_deref(), Some("a"));
        assert_eq!(violations[0].value, Some(json!("x")));
        assert_eq!(violations[1].param.as_deref(), Some("b"));
        assert_eq!(violations[1].value, Some(json!("toolong")));
        assert_eq!(violations[2].param.as_deref(), Some("c"));
        assert_eq!(violations[2].value, None);
    }

    #[test]
    fn test_数値はjson表現を文字列化して評価する() {
        let mut sut = Validator::new();
        let body = body(json!({ "n": 123 }));

        let n = sut.required::<Code3>(&body, "n");

        assert_eq!(n, Some(Code3("123".to_string())));
        assert!(sut.is_valid());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!(["abc"]))]
    #[case(json!({ "v": "abc" }))]
    fn test_スカラー以外の値は違反になる(#[case] value: Value) {
        let mut sut = Validator::new();
        let body = body(json!({ "f": value.clone() }));

        let f = sut.required::<Code3>(&body, "f");

        assert!(f.is_none());
        let errors = sut.finish(|| f).unwrap_err();
        assert_eq!(errors.violations()[0].value, Some(value));
    }

    #[test]
    fn test_解析に失敗したボディはparamなしの違反になる() {
        let mut sut = Validator::new();
        let unparsable: BodyInput = Err("解析できません".to_string());

        let a = sut.path::<Code3>("a", "x");
        let body = sut.body(&unparsable);

        assert!(a.is_none());
        assert!(body.is_none());
        let errors = sut.finish(|| a).unwrap_err();
        assert_eq!(errors.violations().len(), 2);
        assert_eq!(errors.violations()[1].param, None);
        assert_eq!(errors.violations()[1].msg, "解析できません");
    }

    #[test]
    fn test_optionalは未指定なら通過する() {
        let mut sut = Validator::new();
        let body = RequestBody::new();

        let f = sut.optional::<Code3>(&body, "f");

        assert_eq!(f, Some(None));
        assert!(sut.is_valid());
    }

    #[test]
    fn test_optionalは指定ありなら通常どおり検証する() {
        let mut sut = Validator::new();
        let body = body(json!({ "f": "abcd" }));

        let f = sut.optional::<Code3>(&body, "f");

        assert_eq!(f, None);
        assert!(!sut.is_valid());
    }

    #[test]
    fn test_reject_unknownは許可リスト外のキーを記録する() {
        let mut sut = Validator::new();
        let body = body(json!({ "ok": "1", "cust_code": "C00001" }));

        sut.reject_unknown(&body, &["ok"]);

        let errors = sut.finish(|| Some(())).unwrap_err();
        assert_eq!(errors.violations().len(), 1);
        assert_eq!(errors.violations()[0].param.as_deref(), Some("cust_code"));
    }

    #[test]
    fn test_違反がなければbuildの結果を返す() {
        let sut = Validator::new();

        let result = sut.finish(|| Some(42));

        assert_eq!(result, Ok(42));
    }
}
