pub mod distributor;
pub mod planner;
pub mod sink;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::types::time_of_day::TimeOfDay;

/// What the delivery boundary was asked to do.
#[derive(Debug, Clone)]
pub enum ScheduleReport {
    Replaced { times: Vec<TimeOfDay> },
    Cancelled,
}

pub type ScheduleSender = broadcast::Sender<ScheduleReport>;

/// The OS alarm facility behind a seam: this core only produces correct
/// times, delivery is someone else's contract.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn replace_schedule(&self, times: &[TimeOfDay]) -> Result<()>;
    async fn cancel_all(&self) -> Result<()>;
}
