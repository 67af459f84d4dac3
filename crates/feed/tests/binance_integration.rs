use futures::{SinkExt, StreamExt};
use momentum_core::market::error::MarketError;
use momentum_core::market::port::TickSource;
use momentum_feed::binance::BinanceTradeSource;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

fn trade(price: &str, millis: i64) -> String {
    format!(
        r#"{{"e":"trade","E":{millis},"s":"BTCUSDT","t":1,"p":"{price}","q":"0.5","T":{millis},"m":false,"M":true}}"#
    )
}

/// # Summary
/// 集成测试：本地 websocket 服务端推送成交、控制帧与坏消息，验证连接的读取语义。
#[tokio::test]
async fn test_connection_reads_trades_and_reports_close() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await?;
        let mut ws = accept_async(tcp).await?;
        ws.send(Message::text(trade("100.5", 1_700_000_000_000))).await?;
        ws.send(Message::Ping(vec![1, 2, 3].into())).await?;
        ws.send(Message::text(r#"{"result":null,"id":1}"#)).await?;
        ws.send(Message::text(trade("101.25", 1_700_000_060_000))).await?;
        ws.close(None).await?;
        // 等待客户端收尾
        while ws.next().await.is_some() {}
        anyhow::Ok(())
    });

    let source = BinanceTradeSource::new(format!("ws://{addr}/ws/btcusdt@trade"));
    let mut conn = source.connect().await?;

    let first = conn.next_tick().await?;
    assert_eq!(first.price, 100.5);
    assert_eq!(first.timestamp_millis, 1_700_000_000_000);

    // ping 被跳过，下一条是订阅回执
    assert!(matches!(conn.next_tick().await, Err(MarketError::Parse(_))));

    let second = conn.next_tick().await?;
    assert_eq!(second.price, 101.25);

    let closed = conn.next_tick().await;
    assert!(matches!(closed, Err(ref e) if e.requires_reconnect()));

    conn.close().await;
    server.await??;
    Ok(())
}

/// # Summary
/// 集成测试：端口无人监听时建连失败返回网络错误。
#[tokio::test]
async fn test_connect_refused_is_network_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let source = BinanceTradeSource::new(format!("ws://{addr}/ws/btcusdt@trade"));
    let result = source.connect().await;
    assert!(matches!(result, Err(MarketError::Network(_))));
    Ok(())
}

/// # Summary
/// 真实网络测试：连接 Binance 公共行情并读取一笔成交。
#[tokio::test]
#[ignore]
async fn test_real_binance_trade_stream() -> anyhow::Result<()> {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("Crypto provider already installed");
    }
    let source = BinanceTradeSource::new("wss://stream.binance.com:443/ws/btcusdt@trade");
    let mut conn = source.connect().await?;
    let tick = tokio::time::timeout(std::time::Duration::from_secs(30), conn.next_tick()).await??;
    assert_eq!(tick.symbol, "BTCUSDT");
    assert!(tick.price > 0.0);
    conn.close().await;
    Ok(())
}
