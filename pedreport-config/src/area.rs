//! Measurement areas.
//!
//! An area is either a closed polygon or, for one-dimensional analysis, a
//! measurement line. Areas are built once while the settings file is parsed
//! and are looked up by their integer ID afterwards.

use std::collections::BTreeMap;

use geo::orient::{Direction, Orient};
use geo::{Area, Contains, Coord, Line, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A 2D coordinate as written in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl From<Vertex> for Coord<f64> {
    fn from(v: Vertex) -> Self {
        Coord { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    #[default]
    #[serde(alias = "bounding_box")]
    Polygon,
    Line,
}

/// A measurement area block as written in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaBlock {
    pub id: i32,

    #[serde(rename = "type", default)]
    pub kind: AreaKind,

    #[serde(default)]
    pub vertices: Vec<Vertex>,

    #[serde(default)]
    pub start: Option<Vertex>,

    #[serde(default)]
    pub end: Option<Vertex>,

    /// Depth of the area along the main movement direction.
    #[serde(default)]
    pub length_in_movement_direction: Option<f64>,

    /// Elevation of the area for multi-level geometries.
    #[serde(default)]
    pub z_pos: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AreaShape {
    Polygon {
        polygon: Polygon<f64>,
        length_in_movement_direction: Option<f64>,
    },
    Line(Line<f64>),
}

/// A validated measurement area.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementArea {
    id: i32,
    z_pos: Option<f64>,
    shape: AreaShape,
}

impl MeasurementArea {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn z_pos(&self) -> Option<f64> {
        self.z_pos
    }

    pub fn shape(&self) -> &AreaShape {
        &self.shape
    }

    pub fn is_line(&self) -> bool {
        matches!(self.shape, AreaShape::Line(_))
    }

    /// The polygon, counter-clockwise; `None` for a measurement line.
    pub fn polygon(&self) -> Option<&Polygon<f64>> {
        match &self.shape {
            AreaShape::Polygon { polygon, .. } => Some(polygon),
            AreaShape::Line(_) => None,
        }
    }

    pub fn line(&self) -> Option<&Line<f64>> {
        match &self.shape {
            AreaShape::Line(line) => Some(line),
            AreaShape::Polygon { .. } => None,
        }
    }

    pub fn length_in_movement_direction(&self) -> Option<f64> {
        match &self.shape {
            AreaShape::Polygon {
                length_in_movement_direction,
                ..
            } => *length_in_movement_direction,
            AreaShape::Line(_) => None,
        }
    }

    /// Enclosed area; zero for a line.
    pub fn area(&self) -> f64 {
        self.polygon().map_or(0.0, |p| p.unsigned_area())
    }

    /// Length of the measurement line; zero for a polygon.
    pub fn line_length(&self) -> f64 {
        self.line().map_or(0.0, |line| {
            let delta = line.delta();
            delta.x.hypot(delta.y)
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon()
            .is_some_and(|p| p.contains(&Point::new(x, y)))
    }
}

fn checked_coord(id: i32, vertex: Vertex) -> Result<Coord<f64>, ConfigError> {
    if vertex.x.is_finite() && vertex.y.is_finite() {
        Ok(vertex.into())
    } else {
        Err(ConfigError::MalformedCoordinate {
            id,
            detail: format!("({}, {}) is not a finite point", vertex.x, vertex.y),
        })
    }
}

impl TryFrom<AreaBlock> for MeasurementArea {
    type Error = ConfigError;

    fn try_from(block: AreaBlock) -> Result<Self, Self::Error> {
        let id = block.id;
        let shape = match block.kind {
            AreaKind::Line => {
                let (Some(start), Some(end)) = (block.start, block.end) else {
                    return Err(ConfigError::MalformedCoordinate {
                        id,
                        detail: "a measurement line needs both start and end".into(),
                    });
                };
                AreaShape::Line(Line::new(
                    checked_coord(id, start)?,
                    checked_coord(id, end)?,
                ))
            }
            AreaKind::Polygon => {
                if block.vertices.len() < 3 {
                    return Err(ConfigError::TooFewVertices {
                        id,
                        count: block.vertices.len(),
                    });
                }
                let coords = block
                    .vertices
                    .into_iter()
                    .map(|v| checked_coord(id, v))
                    .collect::<Result<Vec<_>, _>>()?;
                let polygon =
                    Polygon::new(LineString::from(coords), vec![]).orient(Direction::Default);
                if polygon.unsigned_area() <= 0.0 {
                    return Err(ConfigError::DegenerateArea(id));
                }
                AreaShape::Polygon {
                    polygon,
                    length_in_movement_direction: block.length_in_movement_direction,
                }
            }
        };
        Ok(Self {
            id,
            z_pos: block.z_pos,
            shape,
        })
    }
}

/// Builds the ID-keyed area table, rejecting duplicate IDs.
pub(crate) fn build_area_table(
    blocks: Vec<AreaBlock>,
) -> Result<BTreeMap<i32, MeasurementArea>, ConfigError> {
    let mut table = BTreeMap::new();
    for block in blocks {
        let area = MeasurementArea::try_from(block)?;
        if table.contains_key(&area.id) {
            return Err(ConfigError::DuplicateArea(area.id));
        }
        tracing::debug!(id = area.id, line = area.is_line(), "measurement area");
        table.insert(area.id, area);
    }
    Ok(table)
}
