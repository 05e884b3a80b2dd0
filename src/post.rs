use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ChirpError;

/// Accumulated status-update payload; fields that were never set are left
/// out of the JSON body entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct PostPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) for_super_followers_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) poll: Option<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) quote_tweet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reply: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reply_settings: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Geo {
    pub(crate) place_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Poll {
    pub(crate) duration_minutes: u32,
    pub(crate) options: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Reply {
    pub(crate) in_reply_to_tweet_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) exclude_reply_user_ids: Vec<String>,
}

/// Builder for a status update with optional fields.
///
/// The builder owns its pending fields; nothing is shared with the client
/// until [`PostBuilder::send`] finalizes the payload and performs the POST.
#[must_use = "a post builder does nothing until send() is called"]
pub struct PostBuilder<'a> {
    client: &'a Client,
    payload: PostPayload,
}

impl<'a> PostBuilder<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            payload: PostPayload::default(),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.payload.text = Some(text.into());
        self
    }

    pub fn for_super_followers(mut self, only: bool) -> Self {
        self.payload.for_super_followers_only = Some(only);
        self
    }

    /// Tag the post with a place by its provider-assigned id.
    pub fn place(mut self, place_id: impl Into<String>) -> Self {
        self.payload.geo = Some(Geo {
            place_id: place_id.into(),
        });
        self
    }

    pub fn poll<I, S>(mut self, duration_minutes: u32, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.poll = Some(Poll {
            duration_minutes,
            options: options.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn quote(mut self, post_id: impl Into<String>) -> Self {
        self.payload.quote_tweet_id = Some(post_id.into());
        self
    }

    pub fn in_reply_to(mut self, post_id: impl Into<String>) -> Self {
        let exclude = self
            .payload
            .reply
            .take()
            .map(|r| r.exclude_reply_user_ids)
            .unwrap_or_default();
        self.payload.reply = Some(Reply {
            in_reply_to_tweet_id: post_id.into(),
            exclude_reply_user_ids: exclude,
        });
        self
    }

    /// Hide the given users from the reply thread. Only meaningful together
    /// with [`PostBuilder::in_reply_to`].
    pub fn exclude_reply_users<I, S>(mut self, user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(reply) = self.payload.reply.as_mut() {
            reply.exclude_reply_user_ids = user_ids.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Who may reply: "everyone", "following", or "mentionedUsers".
    pub fn reply_settings(mut self, settings: impl Into<String>) -> Self {
        self.payload.reply_settings = Some(settings.into());
        self
    }

    /// Drop a previously set field by its payload name, e.g. `"poll"` or
    /// `"quote_tweet_id"`. Unknown names are ignored.
    pub fn remove(mut self, field: &str) -> Self {
        match field {
            "text" => self.payload.text = None,
            "for_super_followers_only" => self.payload.for_super_followers_only = None,
            "geo" => self.payload.geo = None,
            "poll" => self.payload.poll = None,
            "quote_tweet_id" => self.payload.quote_tweet_id = None,
            "reply" => self.payload.reply = None,
            "reply_settings" => self.payload.reply_settings = None,
            other => tracing::debug!("ignoring removal of unknown post field `{other}`"),
        }
        self
    }

    /// Finalize the payload and POST it with the client's current access
    /// token.
    pub async fn send(self) -> Result<PostResponse, ChirpError> {
        self.client.send_post(&self.payload).await
    }
}

/// Response to a successful create-post call.
#[derive(Debug, Clone, Deserialize)]
pub struct PostResponse {
    pub data: PostData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    pub id: String,
    pub text: String,
}
