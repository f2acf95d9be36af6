//! Serenity event handler implementation (event-driven mode)

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::bridge::IssueBridge;
use crate::health::AppState;

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let data = ctx.data.read().await;
        if let Some(bridge) = data.get::<IssueBridge>() {
            bridge.set_bot_user_id(ready.user.id.get());
        }
        if let Some(state) = data.get::<AppState>() {
            state.set_bot_username(ready.user.name.clone()).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Neither our own confirmations nor other bots' messages become
        // issues.
        if msg.author.bot {
            return;
        }

        let (bridge, health) = {
            let data = ctx.data.read().await;
            let bridge = match data.get::<IssueBridge>() {
                Some(b) => b.clone(),
                None => {
                    error!("IssueBridge not found in context data");
                    return;
                }
            };
            (bridge, data.get::<AppState>().cloned())
        };

        if !bridge.watches_channel(msg.channel_id.get()) {
            return;
        }

        let snapshot = IssueBridge::convert_message(&msg, bridge.bot_user_id());
        // The gateway delivers each message exactly once; the marker
        // guard is only needed when re-reading a window.
        if bridge
            .process_message(&ctx.http, &snapshot, false)
            .await
            .is_some()
        {
            if let Some(health) = health {
                health.record_issue_created();
            }
        }
    }
}
