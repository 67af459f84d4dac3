use tokio::sync::watch;
use tracing::debug;

/// # Summary
/// 创建一对停止信号句柄。
///
/// # Returns
/// 触发端由 App 持有，监听端可任意克隆给后台任务。
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// 停止信号触发端
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// 通知所有监听者停止，重复调用无副作用
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// # Summary
/// 停止信号监听端。
///
/// # Invariants
/// - 触发端被丢弃等同于已触发。
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// 是否已收到停止信号 (不等待)
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// 等待停止信号到达
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            debug!("Shutdown trigger dropped, treating as stop");
        }
    }
}
