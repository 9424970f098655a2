// src/asc_models.rs

use crate::error::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Attribute key under which the LTspice `InstName` attribute is stored.
pub const NAME_KEY: &str = "name";

// --- Header ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub number: i32,
    pub width: i32,
    pub height: i32,
}

// --- Symbols ---

/// Symbol orientation. `M*` variants are mirrored before rotating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
    M0,
    M90,
    M180,
    M270,
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::R0 => "R0",
            Rotation::R90 => "R90",
            Rotation::R180 => "R180",
            Rotation::R270 => "R270",
            Rotation::M0 => "M0",
            Rotation::M90 => "M90",
            Rotation::M180 => "M180",
            Rotation::M270 => "M270",
        }
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "R0" => Ok(Rotation::R0),
            "R90" => Ok(Rotation::R90),
            "R180" => Ok(Rotation::R180),
            "R270" => Ok(Rotation::R270),
            "M0" => Ok(Rotation::M0),
            "M90" => Ok(Rotation::M90),
            "M180" => Ok(Rotation::M180),
            "M270" => Ok(Rotation::M270),
            other => Err(format!("unknown rotation `{}`", other)),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered symbol attributes with unique keys.
///
/// Serializes as a JSON object whose key order matches insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Sets `key`, replacing an existing value in place so its position is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The instance name (`InstName`), if any.
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of attribute names to string values")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Attributes, M::Error> {
        let mut attributes = Attributes::new();
        while let Some((k, v)) = access.next_entry::<String, String>()? {
            attributes.insert(k, v);
        }
        Ok(attributes)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
    #[serde(default)]
    pub attributes: Attributes,
}

type ComponentKey = (String, i32, i32, Rotation, String);

impl Component {
    /// Identity used for duplicate detection: type, position, rotation and instance name.
    fn key(&self) -> ComponentKey {
        (
            self.component_type.clone(),
            self.x,
            self.y,
            self.rotation,
            self.attributes.name().unwrap_or_default().to_string(),
        )
    }

    fn same_structure(&self, other: &Component) -> bool {
        self.component_type == other.component_type
            && self.x == other.x
            && self.y == other.y
            && self.rotation == other.rotation
            && self.attributes == other.attributes
    }
}

// --- Wires & flags ---

/// A wire segment. `(x1, y1)` is the start point, `(x2, y2)` the end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

type Point = (i32, i32);

fn origin_distance_sq((x, y): Point) -> i64 {
    let (x, y) = (x as i64, y as i64);
    x * x + y * y
}

impl Wire {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Wire { x1, y1, x2, y2 }
    }

    /// Builds a wire whose start is the endpoint nearer the origin.
    /// On a tie the first endpoint stays the start.
    pub fn from_endpoints(a: Point, b: Point) -> Self {
        let (start, end) = if origin_distance_sq(a) <= origin_distance_sq(b) {
            (a, b)
        } else {
            (b, a)
        };
        Wire::new(start.0, start.1, end.0, end.1)
    }

    pub fn start(&self) -> Point {
        (self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        (self.x2, self.y2)
    }

    /// This wire with the endpoint nearer the origin listed first.
    pub fn normalized(&self) -> Wire {
        Wire::from_endpoints(self.start(), self.end())
    }

    /// Orientation-independent identity: (min endpoint, max endpoint) in lexicographic order.
    pub fn key(&self) -> (Point, Point) {
        let (a, b) = (self.start(), self.end());
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    pub fn is_zero_length(&self) -> bool {
        self.start() == self.end()
    }
}

/// A net label bound to a coordinate. Net `0` is the ground reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flag {
    pub x: i32,
    pub y: i32,
    pub net_name: String,
}

// --- Schematic ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub version: Option<String>,
    pub sheet: Option<Sheet>,
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
    pub flags: Vec<Flag>,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapses duplicate components, wires and flags, keeping first occurrences in order.
    ///
    /// Components are duplicates when type, position, rotation and instance name match;
    /// wires when they cover the same undirected segment.
    pub fn dedup(&mut self) {
        let mut seen_components = HashSet::new();
        self.components.retain(|c| seen_components.insert(c.key()));

        let mut seen_wires = HashSet::new();
        self.wires.retain(|w| seen_wires.insert(w.key()));

        let mut seen_flags = HashSet::new();
        self.flags.retain(|f| seen_flags.insert(f.clone()));
    }

    /// Structural equality: ignores component ids and wire direction.
    pub fn same_structure(&self, other: &Schematic) -> bool {
        self.version == other.version
            && self.sheet == other.sheet
            && self.flags == other.flags
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a.same_structure(b))
            && self.wires.len() == other.wires.len()
            && self
                .wires
                .iter()
                .zip(&other.wires)
                .all(|(a, b)| a.key() == b.key())
    }

    /// Fails with `EmptyInputError` for callers that need at least one component.
    pub fn ensure_has_components(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(Error::EmptyInputError(
                "schematic contains no components".to_string(),
            ));
        }
        Ok(())
    }
}
