use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InitDataError {
    #[error("Malformed init data")]
    Malformed,
    #[error("Missing hash field")]
    MissingHash,
    #[error("Signature mismatch")]
    SignatureMismatch,
}

/// Decoded fields of a verified `initData` payload. Only obtainable
/// through [`verify_init_data`], so holding one implies the signature
/// checked out.
#[derive(Debug)]
pub struct InitData {
    fields: Vec<(String, String)>,
}

impl InitData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `id` of the WebApp user embedded in the signed `user` field.
    pub fn user_id(&self) -> Option<i64> {
        let user: serde_json::Value = serde_json::from_str(self.get("user")?).ok()?;
        user.get("id")?.as_i64()
    }
}

/// Verifies Telegram WebApp `initData` against the bot token and returns
/// the decoded fields.
///
/// Per the Bot API scheme: percent-decode the query pairs, drop `hash`,
/// sort the remaining `key=value` lines, join with `\n`, then compare
/// `hex(HMAC_SHA256(data, HMAC_SHA256(bot_token, "WebAppData")))` with the
/// supplied hash.
pub fn verify_init_data(init_data: &str, bot_token: &str) -> Result<InitData, InitDataError> {
    let mut hash = None;
    let mut fields: Vec<(String, String)> = Vec::new();

    for part in init_data.split('&') {
        if part.is_empty() {
            continue;
        }
        let (key, value) = part.split_once('=').ok_or(InitDataError::Malformed)?;
        let value = urlencoding::decode(value).map_err(|_| InitDataError::Malformed)?;
        if key == "hash" {
            hash = Some(value.into_owned());
        } else {
            fields.push((key.to_string(), value.into_owned()));
        }
    }

    let hash = hash.ok_or(InitDataError::MissingHash)?;
    let mut lines: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
    lines.sort();
    let data_check_string = lines.join("\n");

    let mut secret = Hmac::<Sha256>::new_from_slice(b"WebAppData")
        .map_err(|_| InitDataError::Malformed)?;
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac = Hmac::<Sha256>::new_from_slice(&secret_key)
        .map_err(|_| InitDataError::Malformed)?;
    mac.update(data_check_string.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if expected != hash {
        return Err(InitDataError::SignatureMismatch);
    }
    Ok(InitData { fields })
}
