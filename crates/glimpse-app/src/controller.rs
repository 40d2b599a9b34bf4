use kanal::{AsyncReceiver, AsyncSender};
use glimpse_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::context::ActivationContext;
use crate::events::event_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    context: ActivationContext,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(context: ActivationContext) -> Self {
        Self {
            channels: ChannelSet::new(),
            context,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Must be called inside a tokio runtime context
    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.context.clone(),
            self.channels.events.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn event_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.events.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
