use application::command::shared::IdGenerator;
use application::error::AppError;
use async_trait::async_trait;
use log::warn;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

const NODE_ID_BITS: i64 = 10;
const SEQUENCE_BITS: i64 = 12;
const MAX_NODE_ID: i64 = (1 << NODE_ID_BITS) - 1;
const MAX_SEQUENCE: i64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_SHIFT: i64 = NODE_ID_BITS + SEQUENCE_BITS;
const NODE_ID_SHIFT: i64 = SEQUENCE_BITS;
const EPOCH: i64 = 1609459200000; // 2021-01-01 00:00:00 UTC

/// 雪花算法ID生成器
pub struct SnowflakeIdGenerator {
    node_id: i64,
    /// (last timestamp, sequence)
    state: Mutex<(i64, i64)>,
}

impl SnowflakeIdGenerator {
    pub fn new(node_id: i64) -> Result<Self, AppError> {
        if !(0..=MAX_NODE_ID).contains(&node_id) {
            return Err(AppError::UnknownError(format!(
                "node id must be within 0..={}",
                MAX_NODE_ID
            )));
        }

        Ok(Self {
            node_id,
            state: Mutex::new((0, 0)),
        })
    }

    /// 获取当前时间戳（毫秒）
    fn get_timestamp() -> Result<i64, AppError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .map_err(|e| AppError::UnknownError(format!("failed to read system time: {}", e)))
    }

    fn generate_id(&self, timestamp: i64, sequence: i64) -> i64 {
        ((timestamp - EPOCH) << TIMESTAMP_SHIFT) | (self.node_id << NODE_ID_SHIFT) | sequence
    }

    /// 等待下一个毫秒
    async fn wait_next_millis(last_timestamp: i64) -> Result<i64, AppError> {
        let mut timestamp = Self::get_timestamp()?;
        while timestamp <= last_timestamp {
            tokio::time::sleep(tokio::time::Duration::from_micros(100)).await;
            timestamp = Self::get_timestamp()?;
        }
        Ok(timestamp)
    }
}

#[async_trait]
impl IdGenerator for SnowflakeIdGenerator {
    async fn next_id(&self) -> Result<i64, AppError> {
        let mut state = self.state.lock().await;
        let (last_timestamp, sequence) = *state;

        let mut timestamp = Self::get_timestamp()?;
        if timestamp < last_timestamp {
            warn!(
                "clock moved backwards by {}ms on node {}",
                last_timestamp - timestamp,
                self.node_id
            );
            return Err(AppError::UnknownError(
                "clock moved backwards, refusing to generate id".to_string(),
            ));
        }

        let mut next_sequence = 0;
        if timestamp == last_timestamp {
            next_sequence = (sequence + 1) & MAX_SEQUENCE;
            if next_sequence == 0 {
                timestamp = Self::wait_next_millis(last_timestamp).await?;
            }
        }

        *state = (timestamp, next_sequence);
        Ok(self.generate_id(timestamp, next_sequence))
    }
}
