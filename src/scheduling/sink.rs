use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::scheduling::{NotificationSink, ScheduleReport, ScheduleSender};
use crate::types::time_of_day::TimeOfDay;

/// Stands in for the OS alarm registry: logs every request and mirrors it
/// onto an optional report channel for observers.
#[derive(Debug)]
pub struct DryRunNotificationSink {
    on_report: Option<ScheduleSender>,
}

impl Default for DryRunNotificationSink {
    fn default() -> Self {
        Self { on_report: None }
    }
}

impl DryRunNotificationSink {
    pub fn new(on_report: ScheduleSender) -> Self {
        Self {
            on_report: Some(on_report),
        }
    }

    fn emit(&self, report: ScheduleReport) {
        if let Some(sender) = &self.on_report {
            let _ = sender.send(report);
        }
    }
}

#[async_trait]
impl NotificationSink for DryRunNotificationSink {
    async fn replace_schedule(&self, times: &[TimeOfDay]) -> Result<()> {
        let rendered: Vec<String> = times.iter().map(TimeOfDay::to_string).collect();
        info!(times = ?rendered, "replacing notification schedule");

        self.emit(ScheduleReport::Replaced {
            times: times.to_vec(),
        });
        Ok(())
    }

    async fn cancel_all(&self) -> Result<()> {
        info!("cancelling all scheduled notifications");

        self.emit(ScheduleReport::Cancelled);
        Ok(())
    }
}
