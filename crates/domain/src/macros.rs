/// ルール検証付き String Newtype の共通実装を生成する内部マクロ
///
/// `define_validated_string!` のトリム有無の両アームで共有される
/// `as_str()`, `into_string()`, `AsRef<str>`, `FromStr` を一括生成する。
macro_rules! _validated_string_common {
    ($Name:ident) => {
        impl $Name {
            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// 所有権を持つ文字列に変換する
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

/// ルール検証付き String Newtype を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ、`Serialize` は透過）
/// - `new()`: （任意で trim した後）`rules` を順に評価
/// - `as_str()` / `into_string()` / `AsRef<str>` / `Display`
/// - `FromStr`（[`Validator`](crate::validation::Validator) から利用される）
///
/// # 引数
///
/// - `$label`: エラーメッセージに使うラベル（例: `"顧客コード"`）
/// - `rules`: 評価する [`Rule`](crate::validation::Rule) の配列
/// - `trim`: （任意）`true` を指定すると前後の空白を除去してから検証する
///
/// # 使用例
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use orderdesk_domain::order::AgentCode;
///
/// let code = AgentCode::new(" A003 ")?;
/// assert_eq!(code.as_str(), "A003");
/// # Ok(())
/// # }
/// ```
macro_rules! define_validated_string {
    // トリムアーム: 前後の空白を除去してから検証する
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            rules: [$($rule:expr),+ $(,)?],
            trim: true $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();
                $crate::validation::Rule::check_all(&[$($rule),+], $label, &value)?;
                Ok(Self(value))
            }
        }

        _validated_string_common!($Name);
    };
    // 通常アーム: 入力をそのまま検証する
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            rules: [$($rule:expr),+ $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into();
                $crate::validation::Rule::check_all(&[$($rule),+], $label, &value)?;
                Ok(Self(value))
            }
        }

        _validated_string_common!($Name);
    };
}
