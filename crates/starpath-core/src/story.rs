//! The ordered story dataset, validated and normalised once at load time.

use glam::Vec3;
use serde::Deserialize;

use crate::error::DatasetError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStoryEvent {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    position: [f32; 3],
    #[serde(default)]
    is_end: bool,
    #[serde(default)]
    special: bool,
    #[serde(default)]
    text_before: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoryEvent {
    pub id: String,
    pub date: String,
    pub title: String,
    pub note: String,
    pub images: Vec<String>,
    pub position: Vec3,
    pub is_end: bool,
    pub special: bool,
    pub text_before: Option<String>,
}

impl StoryEvent {
    /// Bare event at `position`; remaining fields empty.
    pub fn new(id: impl Into<String>, date: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            title: String::new(),
            note: String::new(),
            images: Vec::new(),
            position,
            is_end: false,
            special: false,
            text_before: None,
        }
    }
}

fn normalise(index: usize, raw: RawStoryEvent) -> StoryEvent {
    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("point-{index}"));
    StoryEvent {
        id,
        date: raw.date.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        note: raw.note.unwrap_or_default(),
        images: raw.images.unwrap_or_default(),
        position: Vec3::from_array(raw.position),
        is_end: raw.is_end,
        special: raw.special,
        text_before: raw.text_before,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoryDataset {
    events: Vec<StoryEvent>,
}

impl StoryDataset {
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let raw: Vec<RawStoryEvent> = serde_json::from_str(text)?;
        let events = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| normalise(i, r))
            .collect();
        Self::from_events(events)
    }

    pub fn from_events(mut events: Vec<StoryEvent>) -> Result<Self, DatasetError> {
        for (index, event) in events.iter_mut().enumerate() {
            if !event.position.is_finite() {
                return Err(DatasetError::NonFinitePosition { index });
            }
            if event.id.trim().is_empty() {
                event.id = format!("point-{index}");
            }
            if event
                .text_before
                .as_deref()
                .is_some_and(|t| t.trim().is_empty())
            {
                event.text_before = None;
            }
        }
        log::info!("[story] loaded {} events", events.len());
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StoryEvent> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[StoryEvent] {
        &self.events
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.events.iter().map(|e| e.position).collect()
    }

    /// Event nearest to a journey progress in `[0, 1]`.
    pub fn index_at_progress(&self, progress: f32) -> Option<usize> {
        if self.events.is_empty() {
            return None;
        }
        let last = self.events.len() - 1;
        let index = (progress.clamp(0.0, 1.0) * last as f32).round() as usize;
        Some(index.min(last))
    }
}
