//! # Order Service ライブラリ
//!
//! 顧客と注文の REST API を構成するハンドラ・ユースケース・ルーターを公開する。
//! バイナリ（`main.rs`, `generate-openapi`）とテストから利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod openapi;
pub mod usecase;
