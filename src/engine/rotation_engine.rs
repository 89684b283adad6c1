use anyhow::{Result, anyhow};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::command::EngineCommand;
use crate::pool::entry::WeightedEntry;
use crate::pool::weighted_pool::{PoolStatistics, WeightedPool};
use crate::rotation::history::RotationHistory;
use crate::scheduling::{NotificationSink, planner};
use crate::settings::notification_settings::NotificationSettings;
use crate::settings::store::SettingsStore;
use crate::settings::transition::{SideEffect, apply_settings_change};
use crate::types::quote::{Quote, UserQuote, validate_user_text};
use crate::types::time_of_day::TimeOfDay;

pub type DynamicSettingsStore = Box<dyn SettingsStore + Send>;
pub type DynamicNotificationSink = Box<dyn NotificationSink + Send + Sync>;

/// Owns pool, history and settings; consumes commands one at a time.
pub struct RotationEngine {
    pool: WeightedPool,
    history: RotationHistory,
    user_quotes: Vec<UserQuote>,
    settings: NotificationSettings,
    store: DynamicSettingsStore,
    sink: DynamicNotificationSink,
    receiver: mpsc::Receiver<EngineCommand>,
}

/// Cloneable async front to the engine task.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
}

impl RotationEngine {
    pub fn spawn(
        pool: WeightedPool,
        history: RotationHistory,
        settings: NotificationSettings,
        store: DynamicSettingsStore,
        sink: DynamicNotificationSink,
    ) -> EngineHandle {
        let (sender, receiver) = mpsc::channel(64);

        let engine = Self {
            pool,
            history,
            user_quotes: Vec::new(),
            settings,
            store,
            sink,
            receiver,
        };
        tokio::spawn(engine.run());

        EngineHandle { sender }
    }

    async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                EngineCommand::Shutdown => {
                    debug!("engine shutting down");
                    break;
                }
                other => self.handle(other).await,
            }
        }
    }

    async fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Current { reply } => {
                let _ = reply.send(self.history.current());
            }
            EngineCommand::Preview { offset, reply } => {
                let _ = reply.send(self.history.preview(offset, &mut self.pool));
            }
            EngineCommand::MoveNext { reply } => {
                let _ = reply.send(self.history.move_next(&mut self.pool));
            }
            EngineCommand::MovePrevious { reply } => {
                let _ = reply.send(self.history.move_previous());
            }
            EngineCommand::AddUserQuote { text, reply } => {
                let _ = reply.send(self.add_user_quote(&text));
            }
            EngineCommand::RemoveUserQuote { id, reply } => {
                let existed = self.user_quotes.iter().any(|quote| quote.id == id);
                self.user_quotes.retain(|quote| quote.id != id);
                self.pool.remove_matching(|entry| entry.source_id == Some(id));

                let _ = reply.send(existed);
            }
            EngineCommand::UpdateUserQuote { id, text, reply } => {
                let _ = reply.send(self.update_user_quote(id, &text));
            }
            EngineCommand::SetUserQuoteActive {
                id,
                is_active,
                reply,
            } => {
                let mut found = false;
                for quote in &mut self.user_quotes {
                    if quote.id == id {
                        quote.is_active = is_active;
                        found = true;
                    }
                }
                self.pool.set_active(id, is_active);

                let _ = reply.send(found);
            }
            EngineCommand::SetFrequencyMultiplier { multiplier, reply } => {
                self.pool.set_frequency_multiplier(multiplier);
                let _ = reply.send(());
            }
            EngineCommand::ApplySettings { settings, reply } => {
                let effects = self.apply_settings(settings).await;
                let _ = reply.send(effects);
            }
            EngineCommand::RescheduleNow { reply } => {
                let times = planner::plan(&self.settings);
                if let Err(error) = self.sink.replace_schedule(&times).await {
                    warn!(%error, "failed to replace notification schedule");
                }
                let _ = reply.send(times);
            }
            EngineCommand::Statistics { reply } => {
                let _ = reply.send(self.pool.statistics());
            }
            EngineCommand::Shutdown => {}
        }
    }

    fn add_user_quote(&mut self, text: &str) -> Result<UserQuote> {
        let record = UserQuote::new(text)?;

        self.pool
            .add(WeightedEntry::user_authored(record.text.clone(), record.id));
        self.user_quotes.push(record.clone());
        debug!(id = %record.id, "admitted user quote");

        Ok(record)
    }

    fn update_user_quote(&mut self, id: Uuid, text: &str) -> Result<bool> {
        let text = validate_user_text(text)?;

        let mut found = false;
        for quote in &mut self.user_quotes {
            if quote.id == id {
                quote.text = text.clone();
                found = true;
            }
        }
        if found {
            self.pool.update(id, &text);
        }

        Ok(found)
    }

    async fn apply_settings(&mut self, settings: NotificationSettings) -> Vec<SideEffect> {
        let (next, effects) = apply_settings_change(&self.settings, settings);

        for effect in &effects {
            match effect {
                SideEffect::Reschedule(times) => {
                    if let Err(error) = self.sink.replace_schedule(times).await {
                        warn!(%error, "failed to replace notification schedule");
                    }
                }
                SideEffect::Persist => {
                    if let Err(error) = self.store.save_settings(&next) {
                        warn!(%error, "failed to persist settings");
                    }
                }
            }
        }

        if next.frequency_multiplier != self.settings.frequency_multiplier {
            self.pool
                .set_frequency_multiplier(next.frequency_multiplier);
        }
        self.settings = next;

        effects
    }
}

impl EngineHandle {
    pub async fn current(&self) -> Result<Quote> {
        self.request(|reply| EngineCommand::Current { reply }).await
    }

    pub async fn preview(&self, offset: i32) -> Result<Quote> {
        self.request(|reply| EngineCommand::Preview { offset, reply })
            .await
    }

    pub async fn move_next(&self) -> Result<Quote> {
        self.request(|reply| EngineCommand::MoveNext { reply })
            .await
    }

    pub async fn move_previous(&self) -> Result<Option<Quote>> {
        self.request(|reply| EngineCommand::MovePrevious { reply })
            .await
    }

    pub async fn add_user_quote(&self, text: impl Into<String>) -> Result<UserQuote> {
        self.request(|reply| EngineCommand::AddUserQuote {
            text: text.into(),
            reply,
        })
        .await?
    }

    pub async fn remove_user_quote(&self, id: Uuid) -> Result<bool> {
        self.request(|reply| EngineCommand::RemoveUserQuote { id, reply })
            .await
    }

    pub async fn update_user_quote(&self, id: Uuid, text: impl Into<String>) -> Result<bool> {
        self.request(|reply| EngineCommand::UpdateUserQuote {
            id,
            text: text.into(),
            reply,
        })
        .await?
    }

    pub async fn set_user_quote_active(&self, id: Uuid, is_active: bool) -> Result<bool> {
        self.request(|reply| EngineCommand::SetUserQuoteActive {
            id,
            is_active,
            reply,
        })
        .await
    }

    pub async fn set_frequency_multiplier(&self, multiplier: f64) -> Result<()> {
        self.request(|reply| EngineCommand::SetFrequencyMultiplier { multiplier, reply })
            .await
    }

    pub async fn apply_settings(&self, settings: NotificationSettings) -> Result<Vec<SideEffect>> {
        self.request(|reply| EngineCommand::ApplySettings { settings, reply })
            .await
    }

    /// Re-registers the current plan with the sink, e.g. at startup or
    /// after the user re-grants notification permission.
    pub async fn reschedule_now(&self) -> Result<Vec<TimeOfDay>> {
        self.request(|reply| EngineCommand::RescheduleNow { reply })
            .await
    }

    pub async fn statistics(&self) -> Result<PoolStatistics> {
        self.request(|reply| EngineCommand::Statistics { reply })
            .await
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(EngineCommand::Shutdown).await;
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| anyhow!("engine stopped"))?;

        response.await.map_err(|_| anyhow!("engine stopped"))
    }
}
