use anyhow::Result;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::pool::weighted_pool::PoolStatistics;
use crate::settings::notification_settings::NotificationSettings;
use crate::settings::transition::SideEffect;
use crate::types::quote::{Quote, UserQuote};
use crate::types::time_of_day::TimeOfDay;

/// Everything the engine can be asked to do. Mutations funnel through one
/// consumer, so pool and history state is serialized by construction.
#[derive(Debug)]
pub enum EngineCommand {
    Current {
        reply: oneshot::Sender<Quote>,
    },
    Preview {
        offset: i32,
        reply: oneshot::Sender<Quote>,
    },
    MoveNext {
        reply: oneshot::Sender<Quote>,
    },
    MovePrevious {
        reply: oneshot::Sender<Option<Quote>>,
    },
    AddUserQuote {
        text: String,
        reply: oneshot::Sender<Result<UserQuote>>,
    },
    RemoveUserQuote {
        id: Uuid,
        reply: oneshot::Sender<bool>,
    },
    UpdateUserQuote {
        id: Uuid,
        text: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    SetUserQuoteActive {
        id: Uuid,
        is_active: bool,
        reply: oneshot::Sender<bool>,
    },
    SetFrequencyMultiplier {
        multiplier: f64,
        reply: oneshot::Sender<()>,
    },
    ApplySettings {
        settings: NotificationSettings,
        reply: oneshot::Sender<Vec<SideEffect>>,
    },
    RescheduleNow {
        reply: oneshot::Sender<Vec<TimeOfDay>>,
    },
    Statistics {
        reply: oneshot::Sender<PoolStatistics>,
    },
    Shutdown,
}
