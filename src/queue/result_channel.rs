// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::ProbeResult;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::time::Instant;

/// 结果通道错误类型
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// 通道已关闭（对本次调用而言是终止性的）
    #[error("Result channel is closed")]
    Closed,

    /// 在超时时间内没有收到数据，调用方可重试
    #[error("Result channel is empty")]
    Empty,
}

/// 一次 `get` 的结果
#[derive(Debug)]
pub enum Recv {
    /// 按FIFO顺序取到的下一条结果
    Item(ProbeResult),
    /// 超时且没有数据
    Empty,
    /// 通道已关闭且缓冲为空
    Closed,
}

impl Recv {
    pub fn into_result(self) -> Result<ProbeResult, ChannelError> {
        match self {
            Recv::Item(result) => Ok(result),
            Recv::Empty => Err(ChannelError::Empty),
            Recv::Closed => Err(ChannelError::Closed),
        }
    }
}

#[derive(Default)]
struct State {
    buffer: VecDeque<ProbeResult>,
    closed: bool,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    notify: Notify,
}

/// 结果通道
///
/// 任意数量的生产者（工作器）与唯一消费者（导出器）之间可关闭的FIFO交接。
/// 关闭后 `put` 失败，`get` 先取完缓冲中剩余的结果再报告关闭。
/// 克隆得到的句柄共享同一个通道。
#[derive(Clone, Default)]
pub struct ResultChannel {
    inner: Arc<Inner>,
}

impl ResultChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 放入一条结果
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 已入队
    /// * `Err(ChannelError::Closed)` - 通道已关闭，结果被丢弃
    pub fn put(&self, result: ProbeResult) -> Result<(), ChannelError> {
        {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(ChannelError::Closed);
            }
            state.buffer.push_back(result);
        }
        self.inner.notify.notify_one();
        Ok(())
    }

    /// 取出下一条结果，最多等待 `timeout`
    pub async fn get(&self, timeout: Duration) -> Recv {
        let deadline = Instant::now() + timeout;

        loop {
            // Registered before inspecting the state so a put/close in between is not missed.
            let notified = self.inner.notify.notified();

            {
                let mut state = self.inner.state.lock();
                if let Some(result) = state.buffer.pop_front() {
                    return Recv::Item(result);
                }
                if state.closed {
                    return Recv::Closed;
                }
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Recv::Empty;
            }
        }
    }

    /// 关闭通道，可重复调用
    pub fn close(&self) {
        let was_closed = std::mem::replace(&mut self.inner.state.lock().closed, true);
        if !was_closed {
            self.inner.notify.notify_waiters();
            // Also leave a permit for a consumer that is between its state check and its wait.
            self.inner.notify.notify_one();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// 缓冲中尚未被取走的结果数
    pub fn len(&self) -> usize {
        self.inner.state.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
