use bevy::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// Written as a string in config (`kind: "Prop"`) so layered RON merging,
/// which goes through `ron::Value`, keeps the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum StageObjectKind {
    Prop,
    Actor,
    Orchestra,
    Effect,
    Scenery,
}

impl FromStr for StageObjectKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prop" => Ok(Self::Prop),
            "actor" => Ok(Self::Actor),
            "orchestra" => Ok(Self::Orchestra),
            "effect" => Ok(Self::Effect),
            "scenery" => Ok(Self::Scenery),
            _ => Err(format!("unknown stage object kind '{s}'")),
        }
    }
}

impl TryFrom<String> for StageObjectKind {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Everything needed to recreate a stage object; what storage actually keeps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageObjectData {
    pub name: String,
    pub kind: StageObjectKind,
    /// Full width / height in world units. `None` uses `stage.default_prop_size`.
    #[serde(default)]
    pub size: Option<[f32; 2]>,
}

impl StageObjectData {
    pub fn new(name: impl Into<String>, kind: StageObjectKind) -> Self {
        Self { name: name.into(), kind, size: None }
    }
    pub fn with_size(mut self, size: [f32; 2]) -> Self {
        self.size = Some(size);
        self
    }
    pub fn half_extents(&self, default_size: [f32; 2]) -> Vec2 {
        Vec2::from(self.size.unwrap_or(default_size)) * 0.5
    }
}

#[derive(Component, Debug, Clone)]
pub struct StageObject {
    pub data: StageObjectData,
}

/// Objects currently off stage. Order is insertion order; indices shift on `take`.
#[derive(Resource, Debug, Default, Clone)]
pub struct PropStorage {
    items: Vec<StageObjectData>,
}

impl PropStorage {
    pub fn from_items(items: impl IntoIterator<Item = StageObjectData>) -> Self {
        Self { items: items.into_iter().collect() }
    }
    pub fn add(&mut self, data: StageObjectData) {
        self.items.push(data);
    }
    pub fn take(&mut self, index: usize) -> Option<StageObjectData> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
    pub fn get(&self, index: usize) -> Option<&StageObjectData> {
        self.items.get(index)
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &StageObjectData> {
        self.items.iter()
    }
}
