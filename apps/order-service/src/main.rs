//! # Order Service サーバー
//!
//! 顧客と注文を管理する REST API サーバー。
//!
//! ## 役割
//!
//! - **入力検証**: パスパラメータとボディを検証し、全違反を 400 で返す
//! - **データ永続化**: PostgreSQL の `customer` / `orders` テーブルを読み書きする
//! - **API ドキュメント**: `/docs` で OpenAPI ドキュメントを返す
//!
//! ## 環境変数
//!
//! 接続先やタイムアウトは [`orderdesk_order_service::config`] を参照。
//! ログは `RUST_LOG`（フィルタ）と `LOG_FORMAT`（`json` / `pretty`）で制御する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p orderdesk-order-service
//!
//! # 本番環境
//! ORDERDESK_PORT=3000 DATABASE_URL=postgres://... cargo run -p orderdesk-order-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use orderdesk_infra::{
    db::{self, PgTransactionManager},
    repository::{PostgresCustomerRepository, PostgresOrderRepository},
};
use orderdesk_order_service::{
    app_builder::{AppDependencies, build_app},
    config::OrderConfig,
};
use orderdesk_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Order Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("order-service"));
    let _tracing_guard = tracing::info_span!("app", service = "order-service").entered();

    // 設定読み込み
    let config = OrderConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Order Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database)
        .await
        .context("データベース接続プールの作成に失敗しました")?;
    tracing::info!(database = ?config.database.target, "データベース接続プールを作成しました");

    // 依存コンポーネントを初期化
    let deps = AppDependencies {
        customer_repository: Arc::new(PostgresCustomerRepository::new(pool.clone())),
        order_repository:    Arc::new(PostgresOrderRepository::new(pool.clone())),
        tx_manager:          Arc::new(PgTransactionManager::new(pool.clone())),
        pool,
    };
    let app = build_app(deps, config.request_timeout);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Order Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Order Service サーバーを停止しました");
    Ok(())
}

/// 終了シグナル（Ctrl+C / SIGTERM）を待つ
///
/// シグナルハンドラを登録できなかった場合は、そのシグナルでは停止しない。
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Ctrl+C を受信しました。グレースフルシャットダウンを開始します");
        },
        () = terminate => {
            tracing::info!("SIGTERM を受信しました。グレースフルシャットダウンを開始します");
        },
    }
}
