//! Payload models for the skin-generation API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The skin model variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Let the server detect the variant from the image.
    #[default]
    Auto,
    /// The classic (wide-arm) model.
    Classic,
    /// The slim (thin-arm) model.
    Slim,
}

impl Variant {
    /// Returns the wire name of the variant.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Classic => "classic",
            Self::Slim => "slim",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can find a generated skin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed publicly.
    #[default]
    Public,
    /// Reachable by link only.
    Unlisted,
    /// Visible to the owning account only.
    Private,
}

impl Visibility {
    /// Returns the wire name of the visibility.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of a queued generate job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not yet started.
    Waiting,
    /// Currently being generated.
    Processing,
    /// Finished; the skin is available.
    Completed,
    /// Generation failed.
    Failed,
    /// A state this client version does not know.
    #[serde(other)]
    Unknown,
}

/// One queued generate job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueJob {
    /// The job ID, used to poll for completion.
    pub id: String,
    /// The current state of the job.
    pub status: JobStatus,
}

/// A generated skin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Skin {
    /// The skin's UUID.
    pub uuid: String,
    /// The display name, if one was set at generation time.
    pub name: Option<String>,
    /// The model variant the server settled on.
    pub variant: Variant,
    /// The texture produced for this skin.
    pub texture: SkinTexture,
}

/// Texture data attached to a generated skin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkinTexture {
    /// The signed texture payload.
    pub data: TextureData,
    /// Direct texture URLs, when the server provides them.
    pub url: Option<TextureUrl>,
}

/// The signed texture property as accepted by game servers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextureData {
    /// The base64 texture value.
    pub value: String,
    /// The server signature over `value`.
    pub signature: String,
}

/// Direct texture image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextureUrl {
    /// The skin image URL.
    pub skin: String,
    /// The cape image URL, if the source had one.
    pub cape: Option<String>,
}
