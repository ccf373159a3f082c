use super::image::InputImage;
use crate::sanitize::sanitize;
use serde::Serialize;

/// One submission from the form. Either field may be missing; when both are
/// the request still goes out and the model decides what to make of it.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
    pub image: Option<InputImage>,
}

/// Ordered element of the content list sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part<'a> {
    Text(&'a str),
    Image(&'a InputImage),
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank prompts count as no prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.prompt = if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        };
        self
    }

    pub fn with_image(mut self, image: InputImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.prompt().is_none() && self.image.is_none()
    }

    /// `[prompt, image]` when a prompt is given, otherwise `[image]`.
    pub fn parts(&self) -> Vec<Part<'_>> {
        let mut parts = Vec::with_capacity(2);
        if let Some(prompt) = self.prompt() {
            parts.push(Part::Text(prompt));
        }
        if let Some(image) = &self.image {
            parts.push(Part::Image(image));
        }
        parts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub raw: String,
    pub text: String,
}

impl GenerationResult {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = sanitize(&raw);
        Self { raw, text }
    }
}

/// What the presentation layer renders for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationOutcome {
    Success {
        text: String,
        raw: String,
    },
    Failure {
        #[serde(skip)]
        code: u16,
        error: String,
    },
}

impl GenerationOutcome {
    pub fn from_result(result: crate::error::Result<String>) -> Self {
        match result {
            Ok(raw) => {
                let GenerationResult { raw, text } = GenerationResult::from_raw(raw);
                Self::Success { text, raw }
            }
            Err(e) => Self::Failure {
                code: e.status_code(),
                error: e.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { code, .. } => *code,
        }
    }
}
