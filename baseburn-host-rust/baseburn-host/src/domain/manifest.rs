//! Mini app identity manifest served under `/.well-known`.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::HostConfig;

pub const FRAME_VERSION: &str = "1";

/// Signed association between the app domain and a Farcaster account.
/// Unset values are left out of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssociation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl AccountAssociation {
    pub fn is_complete(&self) -> bool {
        self.header.is_some() && self.payload.is_some() && self.signature.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetadata {
    pub version: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniAppManifest {
    pub account_association: AccountAssociation,
    pub frame: FrameMetadata,
}

impl MiniAppManifest {
    pub fn from_config(config: &HostConfig) -> Self {
        let home_url = config
            .public_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string());

        Self {
            account_association: AccountAssociation {
                header: config.farcaster_header.clone(),
                payload: config.farcaster_payload.clone(),
                signature: config.farcaster_signature.clone(),
            },
            frame: FrameMetadata {
                version: FRAME_VERSION.to_string(),
                name: config.miniapp_name.clone(),
                icon_url: home_url.as_ref().map(|url| format!("{url}/icon.png")),
                home_url,
            },
        }
    }
}
