use std::sync::Arc;
use std::time::Duration;

use gatekeeper_services::admission::ChatMemberEvent;
use gatekeeper_services::telegram::{CallbackQuery, Message, Update};
use gatekeeper_services::{AdmissionService, TelegramClient, VerificationService};
use tracing::{debug, error, info};

use crate::lessons;

const HELP_TEXT: &str = "Commands:\n\
    /start — verify your membership\n\
    /cancel — abort an ongoing verification\n\
    /learn — open the learning guide\n\
    /about — what this bot does";

const ABOUT_TEXT: &str = "🤖 I manage access to our private chats. \
    Verified members get an invite link; everyone else is shown the door.";

/// Routes incoming updates: membership changes go to the admission
/// reconciler, commands and free text to the verification conversation,
/// callback queries to the lesson menu.
pub struct Dispatcher {
    client: Arc<TelegramClient>,
    verification: Arc<VerificationService>,
    admission: Arc<AdmissionService>,
    bot_id: i64,
}

impl Dispatcher {
    pub fn new(
        client: Arc<TelegramClient>,
        verification: Arc<VerificationService>,
        admission: Arc<AdmissionService>,
        bot_id: i64,
    ) -> Self {
        Self {
            client,
            verification,
            admission,
            bot_id,
        }
    }

    /// Long-poll loop. Poll failures back off briefly and retry; a failed
    /// update never stops the loop.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut offset: Option<i64> = None;
        info!("Bot polling for updates");

        loop {
            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    error!(error = %e, "getUpdates failed");
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                if let Err(e) = self.dispatch(update).await {
                    error!(error = %e, "Update handling failed");
                }
            }
        }
    }

    async fn dispatch(&self, update: Update) -> anyhow::Result<()> {
        if let Some(member) = update.my_chat_member.as_ref().or(update.chat_member.as_ref()) {
            let event = ChatMemberEvent::from_update(member, self.bot_id);
            self.admission.handle(event).await?;
            return Ok(());
        }

        if let Some(query) = update.callback_query {
            return self.handle_callback(query).await;
        }

        if let Some(message) = update.message {
            return self.handle_message(message).await;
        }

        Ok(())
    }

    async fn handle_message(&self, message: Message) -> anyhow::Result<()> {
        let Some(from) = message.from.clone() else {
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let chat_id = message.chat.id;

        if let Some(rest) = text.strip_prefix('/') {
            let command = rest.split_whitespace().next().unwrap_or("");
            // Strip the @BotName suffix used in group chats
            let command = command.split('@').next().unwrap_or(command);

            match command {
                "start" => {
                    let reply = self.verification.start(from.id);
                    self.client.send_message(chat_id, &reply).await?;
                }
                "cancel" => {
                    let reply = self.verification.cancel(from.id);
                    self.client.send_message(chat_id, &reply).await?;
                }
                "help" => self.client.send_message(chat_id, HELP_TEXT).await?,
                "about" => self.client.send_message(chat_id, ABOUT_TEXT).await?,
                "learn" => {
                    self.client
                        .send_message_with_markup(chat_id, lessons::MENU_TEXT, lessons::menu_markup())
                        .await?;
                }
                _ => debug!(command, "Ignoring unknown command"),
            }
            return Ok(());
        }

        if let Some(reply) = self.verification.handle_text(&from, text).await? {
            self.client.send_message(chat_id, &reply).await?;
        }

        Ok(())
    }

    async fn handle_callback(&self, query: CallbackQuery) -> anyhow::Result<()> {
        self.client.answer_callback_query(&query.id).await?;

        let Some(data) = query.data.as_deref() else {
            return Ok(());
        };
        let text = lessons::lesson_text(data);

        match query.message {
            Some(message) => {
                self.client
                    .edit_message_text(message.chat.id, message.message_id, text)
                    .await?;
            }
            None => self.client.send_message(query.from.id, text).await?,
        }

        Ok(())
    }
}
