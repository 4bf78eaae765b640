//! Discord channel adapter.
//!
//! Owns the serenity gateway client: registers the global `/upload` slash
//! command on ready, and routes each invocation through the upload
//! pipeline. Followups ride the interaction channel, so the bot needs no
//! message-content privileges.

use crate::upload::{run_upload, UploadDeps, UploadRequest};
use crate::ChannelAdapter;
use archivist_core::{AttachmentFetcher, AttachmentRef, Notify, UploadError};
use async_trait::async_trait;
use serenity::all::{
    ActivityData, Command, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponseFollowup, EventHandler, GatewayIntents,
    Interaction, Ready, ResolvedValue,
};
use serenity::http::Http;
use serenity::Client;
use std::sync::Arc;
use tracing::{error, info};

/// Name of the slash command this adapter serves.
pub const UPLOAD_COMMAND: &str = "upload";

/// Maximum attachment slots on the command (file1 required, rest optional).
const SLOT_COUNT: usize = 10;

/// The global `/upload` command definition.
pub fn upload_command() -> CreateCommand {
    let mut command = CreateCommand::new(UPLOAD_COMMAND)
        .description("Upload up to 10 files to Archive.org")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Attachment,
                "file1",
                "Required file (up to 100MB)",
            )
            .required(true),
        );
    for slot in 2..=SLOT_COUNT {
        command = command.add_option(CreateCommandOption::new(
            CommandOptionType::Attachment,
            format!("file{slot}"),
            "Optional file (up to 100MB)",
        ));
    }
    command
}

/// Collect filled attachment slots in slot order (file1..file10), not the
/// order the platform happens to serialize options in.
fn attachments_in_slot_order(command: &CommandInteraction) -> Vec<AttachmentRef> {
    let options = command.data.options();
    (1..=SLOT_COUNT)
        .filter_map(|slot| {
            let name = format!("file{slot}");
            options
                .iter()
                .find(|option| option.name == name)
                .and_then(|option| match &option.value {
                    ResolvedValue::Attachment(attachment) => Some(AttachmentRef {
                        filename: attachment.filename.clone(),
                        size: u64::from(attachment.size),
                        url: attachment.url.clone(),
                    }),
                    _ => None,
                })
        })
        .collect()
}

/// Sends status messages as interaction followups.
struct FollowupNotifier {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

#[async_trait]
impl Notify for FollowupNotifier {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.interaction
            .create_followup(
                &self.http,
                CreateInteractionResponseFollowup::new().content(text),
            )
            .await?;
        Ok(())
    }
}

/// Downloads attachment bytes from the Discord CDN.
pub struct CdnFetcher {
    http: reqwest::Client,
}

impl CdnFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for CdnFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentFetcher for CdnFetcher {
    async fn fetch(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, UploadError> {
        let fetch_error = |reason: String| UploadError::Fetch {
            filename: attachment.filename.clone(),
            reason,
        };

        let response = self
            .http
            .get(&attachment.url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("CDN returned {}", response.status())));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

struct Handler {
    deps: Arc<UploadDeps>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);
        ctx.set_activity(Some(ActivityData::playing("archive.org uploads")));

        if let Err(e) = Command::create_global_command(&ctx.http, upload_command()).await {
            error!("Failed to register /upload command: {e:?}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.data.name != UPLOAD_COMMAND {
            return;
        }

        // Transfers take longer than the interaction response window;
        // defer first so the platform keeps the invocation open.
        if let Err(e) = command.defer(&ctx.http).await {
            error!("Failed to defer /upload interaction: {e:?}");
            return;
        }

        let request = UploadRequest {
            username: command.user.name.clone(),
            attachments: attachments_in_slot_order(&command),
        };
        let notify = FollowupNotifier {
            http: Arc::clone(&ctx.http),
            interaction: command.clone(),
        };

        let outcome = run_upload(&self.deps, &notify, request).await;
        info!(user = %command.user.name, outcome = ?outcome, "/upload invocation finished");
    }
}

pub struct DiscordAdapter {
    token: String,
    deps: Arc<UploadDeps>,
}

impl DiscordAdapter {
    pub fn new(token: String, deps: Arc<UploadDeps>) -> Self {
        Self { token, deps }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Discord adapter");

        // Slash commands arrive as interactions; no privileged intents needed.
        let intents = GatewayIntents::GUILD_MESSAGES;

        let mut client = Client::builder(&self.token, intents)
            .event_handler(Handler {
                deps: Arc::clone(&self.deps),
            })
            .await?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
