use async_trait::async_trait;
use futures::StreamExt;
use momentum_core::market::entity::Tick;
use momentum_core::market::error::MarketError;
use momentum_core::market::port::{TickConnection, TickSource};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// # Summary
/// Binance `<symbol>@trade` 推送的单条成交事件。
///
/// # Invariants
/// - 价格与数量以字符串下发，需要自行解析。
/// - `T` 为成交时间，单位毫秒。
#[derive(Debug, Deserialize)]
struct TradeEvent {
    #[serde(rename = "e")]
    event_type: String,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q", default)]
    quantity: Option<String>,
    #[serde(rename = "T")]
    trade_time: i64,
}

/// # Summary
/// 将一条文本帧解析为逐笔成交。
///
/// # Logic
/// 1. 按 JSON 反序列化为成交事件，缺字段视为解析失败。
/// 2. 非 `trade` 事件 (如订阅回执) 视为解析失败，由上层跳过。
/// 3. 价格字符串解析为 f64，非有限值视为解析失败。
///
/// # Returns
/// 成功返回 `Tick`，任何格式问题都返回 `MarketError::Parse`。
pub fn parse_trade(text: &str) -> Result<Tick, MarketError> {
    let event: TradeEvent =
        serde_json::from_str(text).map_err(|e| MarketError::Parse(e.to_string()))?;

    if event.event_type != "trade" {
        return Err(MarketError::Parse(format!(
            "unexpected event type: {}",
            event.event_type
        )));
    }

    let price: f64 = event
        .price
        .parse()
        .map_err(|_| MarketError::Parse(format!("invalid price: {}", event.price)))?;
    if !price.is_finite() {
        return Err(MarketError::Parse(format!("invalid price: {}", event.price)));
    }

    debug!(symbol = %event.symbol, price, qty = ?event.quantity, "Trade parsed");
    Ok(Tick {
        symbol: event.symbol,
        price,
        timestamp_millis: event.trade_time,
    })
}

/// # Summary
/// Binance 逐笔成交行情源。
///
/// # Invariants
/// - 每次 `connect` 都新建一条 websocket 连接，不复用旧连接。
#[derive(Debug, Clone)]
pub struct BinanceTradeSource {
    url: String,
}

impl BinanceTradeSource {
    /// # Arguments
    /// * `url`: 完整的订阅地址，如 `wss://stream.binance.com:443/ws/btcusdt@trade`。
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TickSource for BinanceTradeSource {
    async fn connect(&self) -> Result<Box<dyn TickConnection>, MarketError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;
        info!(url = %self.url, "Connected to Binance trade stream");
        Ok(Box::new(BinanceConnection { stream }))
    }
}

/// 单条 Binance websocket 连接
struct BinanceConnection {
    stream: WsStream,
}

#[async_trait]
impl TickConnection for BinanceConnection {
    /// # Logic
    /// 1. 跳过 ping/pong/二进制等非文本帧。
    /// 2. 收到关闭帧或流结束返回 `MarketError::Closed`。
    /// 3. 读取错误返回 `MarketError::Network`。
    async fn next_tick(&mut self) -> Result<Tick, MarketError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return parse_trade(text.as_str()),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Close frame received");
                    return Err(MarketError::Closed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(MarketError::Network(e.to_string())),
                None => return Err(MarketError::Closed),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "Websocket close failed");
        }
    }
}
