#[cfg(test)]
mod tests {
    use crate::bridge::IssueBridge;
    use crate::config::{Config, DiscordConfig, FeedbackConfig, GithubConfig, IngestConfig};
    use issue_github::IssueClient;
    use issue_types::{compose_issue, render_attachments, split_content, IntakePolicy};
    use serenity::model::channel::Message as SerenityMessage;

    const BOT_USER_ID: u64 = 777;

    // ── JSON helpers ──────────────────────────────────────────────────────────

    fn user_json(id: u64, username: &str, bot: bool) -> serde_json::Value {
        serde_json::json!({
            "id": id.to_string(),
            "username": username,
            "global_name": null,
            "avatar": null,
            "bot": bot
        })
    }

    fn attachment_json(id: u64, filename: &str, url: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id.to_string(),
            "filename": filename,
            "description": null,
            "content_type": "image/png",
            "size": 1024,
            "url": url,
            "proxy_url": url,
            "height": null,
            "width": null,
            "ephemeral": false
        })
    }

    fn reaction_json(emoji: serde_json::Value, me: bool) -> serde_json::Value {
        serde_json::json!({
            "count": 1,
            "count_details": { "burst": 0, "normal": 1 },
            "me": me,
            "me_burst": false,
            "emoji": emoji,
            "burst_colors": []
        })
    }

    fn unicode_emoji(name: &str) -> serde_json::Value {
        serde_json::json!({ "id": null, "name": name })
    }

    fn dm_message_json(
        message_id: u64,
        channel_id: u64,
        user_id: u64,
        content: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "id": message_id.to_string(),
            "channel_id": channel_id.to_string(),
            "author": user_json(user_id, "alice", false),
            "content": content,
            "timestamp": "2024-01-01T00:00:00+00:00",
            "edited_timestamp": null,
            "tts": false,
            "mention_everyone": false,
            "mentions": [],
            "mention_roles": [],
            "attachments": [],
            "embeds": [],
            "pinned": false,
            "type": 0
        })
    }

    fn guild_message_json(
        message_id: u64,
        channel_id: u64,
        guild_id: u64,
        user_id: u64,
        content: &str,
    ) -> serde_json::Value {
        let mut v = dm_message_json(message_id, channel_id, user_id, content);
        v["guild_id"] = serde_json::Value::String(guild_id.to_string());
        v
    }

    fn parse_message(json: serde_json::Value) -> SerenityMessage {
        serde_json::from_value(json).expect("construct SerenityMessage")
    }

    // ── Bridge construction ───────────────────────────────────────────────────

    fn test_config() -> Config {
        Config {
            discord: DiscordConfig {
                bot_token: "BOT-TOKEN".to_string(),
                channel_id: 4242,
                exclude_users: vec![99],
            },
            github: GithubConfig {
                owner: "octocat".to_string(),
                repo: "hello-world".to_string(),
                token: "ghp_abc".to_string(),
                api_url: "http://127.0.0.1:1".to_string(),
            },
            ingest: IngestConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }

    fn test_bridge() -> IssueBridge {
        let config = test_config();
        let client = IssueClient::with_base_url(
            config.github.token.clone(),
            config.github.owner.clone(),
            config.github.repo.clone(),
            config.github.api_url.clone(),
        )
        .expect("build client");
        IssueBridge::new(client, &config)
    }

    // ── convert_message ───────────────────────────────────────────────────────

    #[test]
    fn test_convert_copies_identity_fields() {
        let msg = parse_message(guild_message_json(1, 4242, 100, 10, "a bug"));
        let snapshot = IssueBridge::convert_message(&msg, BOT_USER_ID);
        assert_eq!(snapshot.id, 1);
        assert_eq!(snapshot.channel_id, 4242);
        assert_eq!(snapshot.author.id, 10);
        assert_eq!(snapshot.author.username, "alice");
        assert!(!snapshot.author.bot);
        assert_eq!(snapshot.content, "a bug");
    }

    #[test]
    fn test_convert_guild_message_is_deletable() {
        let msg = parse_message(guild_message_json(1, 4242, 100, 10, "a bug"));
        let snapshot = IssueBridge::convert_message(&msg, BOT_USER_ID);
        assert!(snapshot.deletable);
    }

    #[test]
    fn test_convert_foreign_dm_not_deletable() {
        let msg = parse_message(dm_message_json(1, 4242, 10, "a bug"));
        let snapshot = IssueBridge::convert_message(&msg, BOT_USER_ID);
        assert!(!snapshot.deletable);
    }

    #[test]
    fn test_convert_own_dm_is_deletable() {
        let msg = parse_message(dm_message_json(1, 4242, BOT_USER_ID, "a bug"));
        let snapshot = IssueBridge::convert_message(&msg, BOT_USER_ID);
        assert!(snapshot.deletable);
    }

    #[test]
    fn test_convert_preserves_attachment_order() {
        let mut json = guild_message_json(1, 4242, 100, 10, "with shots");
        json["attachments"] = serde_json::json!([
            attachment_json(1, "a.png", "u1"),
            attachment_json(2, "b.png", "u2"),
        ]);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);
        assert_eq!(snapshot.attachments.len(), 2);
        assert_eq!(snapshot.attachments[0].filename, "a.png");
        assert_eq!(snapshot.attachments[0].url, "u1");
        assert_eq!(snapshot.attachments[1].filename, "b.png");
    }

    #[test]
    fn test_convert_collects_own_unicode_reactions() {
        let mut json = guild_message_json(1, 4242, 100, 10, "handled already");
        json["reactions"] = serde_json::json!([
            reaction_json(unicode_emoji("✅"), true),
            reaction_json(unicode_emoji("👍"), false),
        ]);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);
        assert_eq!(snapshot.own_reactions, vec!["✅".to_string()]);
    }

    #[test]
    fn test_convert_ignores_custom_emoji_reactions() {
        let mut json = guild_message_json(1, 4242, 100, 10, "custom");
        json["reactions"] = serde_json::json!([reaction_json(
            serde_json::json!({ "id": "555", "name": "partyparrot", "animated": false }),
            true
        )]);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);
        assert!(snapshot.own_reactions.is_empty());
    }

    // ── Bridge state ──────────────────────────────────────────────────────────

    #[test]
    fn test_watches_only_configured_channel() {
        let bridge = test_bridge();
        assert!(bridge.watches_channel(4242));
        assert!(!bridge.watches_channel(4243));
    }

    #[test]
    fn test_bot_user_id_roundtrip() {
        let bridge = test_bridge();
        assert_eq!(bridge.bot_user_id(), 0);
        bridge.set_bot_user_id(BOT_USER_ID);
        assert_eq!(bridge.bot_user_id(), BOT_USER_ID);
    }

    // ── Converted snapshot through the pure pipeline ──────────────────────────

    #[test]
    fn test_converted_message_composes_expected_issue() {
        let msg = parse_message(guild_message_json(
            1,
            4242,
            100,
            10,
            "Bug: button broken\nClicking the button does nothing.",
        ));
        let snapshot = IssueBridge::convert_message(&msg, BOT_USER_ID);

        let split = split_content(&snapshot.content);
        let draft = compose_issue(&split, &snapshot.author.username, "");

        assert_eq!(draft.title, "Bug: button broken");
        assert_eq!(
            draft.body,
            "Clicking the button does nothing.<br /> Issue created by: alice"
        );
    }

    #[test]
    fn test_converted_attachments_render_in_order() {
        let mut json = guild_message_json(1, 4242, 100, 10, "title\nbody");
        json["attachments"] = serde_json::json!([
            attachment_json(1, "a.png", "u1"),
            attachment_json(2, "b.png", "u2"),
        ]);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);
        assert_eq!(render_attachments(&snapshot.attachments), "![a.png](u1)![b.png](u2)");
    }

    #[test]
    fn test_excluded_author_rejected_after_conversion() {
        let mut json = guild_message_json(1, 4242, 100, 10, "a bug");
        json["author"] = user_json(99, "excluded", false);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);

        let policy = IntakePolicy::new(test_config().discord.exclude_users);
        assert!(!policy.should_process(&snapshot, false));
    }

    #[test]
    fn test_marked_message_rejected_when_polling() {
        let mut json = guild_message_json(1, 4242, 100, 10, "already handled");
        json["reactions"] = serde_json::json!([reaction_json(unicode_emoji("❌"), true)]);
        let snapshot = IssueBridge::convert_message(&parse_message(json), BOT_USER_ID);

        let policy = IntakePolicy::default();
        assert!(!policy.should_process(&snapshot, true));
        assert!(policy.should_process(&snapshot, false));
    }
}
