use serde::{Deserialize, Serialize};

/// One slide boundary extracted from the outline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideDescriptor {
    pub number: u32,
    pub title: String,
    pub body: String,
}

/// Callers name a slide either as a bare number or as an object carrying a
/// `number` field; both forms show up in real requests.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum SlideRef {
    Number(u32),
    Object { number: u32 },
}

impl SlideRef {
    pub fn number(&self) -> u32 {
        match self {
            SlideRef::Number(n) => *n,
            SlideRef::Object { number } => *number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Title,
    Subtitle,
    Text,
    Bullet,
    Chart,
    Table,
    Image,
}

/// One structural unit of generated slide content. `data` carries the
/// structured series for chart/table blocks; `style` is passed through to
/// the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPayload {
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub const FALLBACK_MESSAGE: &str =
    "Content generation failed for this slide. Edit it manually or regenerate the deck.";

impl GeneratedPayload {
    /// Fixed placeholder substituted whenever generation or parsing fails
    /// for a slide. Always a single text block, never empty.
    pub fn fallback() -> Self {
        GeneratedPayload {
            blocks: vec![ContentBlock {
                block_type: BlockType::Text,
                content: FALLBACK_MESSAGE.to_string(),
                data: None,
                style: None,
            }],
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSlide {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub content: GeneratedPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedSlide {
    pub fn new(descriptor: &SlideDescriptor, content: GeneratedPayload) -> Self {
        GeneratedSlide {
            id: format!("slide-{}", descriptor.number),
            number: descriptor.number,
            title: descriptor.title.clone(),
            content,
            error: None,
        }
    }

    pub fn fallback(descriptor: &SlideDescriptor, error: String) -> Self {
        GeneratedSlide {
            error: Some(error),
            ..GeneratedSlide::new(descriptor, GeneratedPayload::fallback())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub outline: String,
    pub selected_slides: Vec<SlideRef>,
    #[serde(default)]
    pub pitch_context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_slides: Vec<GeneratedSlide>,
    pub message: String,
}
