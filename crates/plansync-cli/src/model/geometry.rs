//! Polymorphic map geometry (mission areas, project boundaries).

use plansync_core::SyncEq;
use plansync_core::codec::{self, ReadContext, Serializable, TypeRegistry, WriteContext};
use std::sync::LazyLock;

/// A shape on the map, in WGS84 `[lat, lon]` (and altitude for points).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon { vertices: Vec<[f64; 2]> },
    /// A buffered path: everything within `width / 2` metres of the polyline.
    Corridor { path: Vec<[f64; 2]>, width: f64 },
    Point { position: [f64; 3] },
}

impl Geometry {
    pub fn polygon(vertices: &[[f64; 2]]) -> Self {
        Geometry::Polygon {
            vertices: vertices.to_vec(),
        }
    }

    pub fn corridor(path: &[[f64; 2]], width: f64) -> Self {
        Geometry::Corridor {
            path: path.to_vec(),
            width,
        }
    }

    pub fn point(lat: f64, lon: f64, alt: f64) -> Self {
        Geometry::Point {
            position: [lat, lon, alt],
        }
    }
}

impl SyncEq for Geometry {
    fn sync_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Geometry::Polygon { vertices: a }, Geometry::Polygon { vertices: b }) => a.sync_eq(b),
            (
                Geometry::Corridor { path: a, width: wa },
                Geometry::Corridor { path: b, width: wb },
            ) => a.sync_eq(b) && wa.sync_eq(wb),
            (Geometry::Point { position: a }, Geometry::Point { position: b }) => a.sync_eq(b),
            _ => false,
        }
    }
}

impl Serializable for Geometry {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        match self {
            Geometry::Polygon { vertices } => ctx.write_value_list("vertices", vertices),
            Geometry::Corridor { path, width } => {
                ctx.write_value_list("path", path)?;
                ctx.write_value("width", width)
            }
            Geometry::Point { position } => ctx.write_value("position", position),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon { .. } => "Polygon",
            Geometry::Corridor { .. } => "Corridor",
            Geometry::Point { .. } => "Point",
        }
    }
}

fn read_polygon(ctx: &ReadContext<'_>) -> codec::Result<Geometry> {
    Ok(Geometry::Polygon {
        vertices: ctx.read_value_list("vertices")?,
    })
}

fn read_corridor(ctx: &ReadContext<'_>) -> codec::Result<Geometry> {
    let width: f64 = ctx.read_value("width")?;
    if width < 0.0 {
        return Err(codec::CodecError::InvalidValue {
            path: ctx.field_path("width"),
            reason: format!("corridor width must not be negative, got {}", width),
        });
    }
    Ok(Geometry::Corridor {
        path: ctx.read_value_list("path")?,
        width,
    })
}

fn read_point(ctx: &ReadContext<'_>) -> codec::Result<Geometry> {
    Ok(Geometry::Point {
        position: ctx.read_value("position")?,
    })
}

pub static GEOMETRY_TYPES: LazyLock<TypeRegistry<Geometry>> = LazyLock::new(|| {
    TypeRegistry::new("Geometry")
        .with_candidate("Polygon", read_polygon)
        .with_candidate("Corridor", read_corridor)
        .with_candidate("Point", read_point)
});

#[cfg(test)]
mod tests {
    use super::*;
    use plansync_core::codec::CodecError;
    use plansync_core::{
        Deserializable, Dirty, DryRun, Mergeable, PropertyOwner, SyncContext, TrackedValue,
    };

    #[derive(Debug)]
    struct Survey {
        area: Geometry,
    }

    impl Serializable for Survey {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
            ctx.write_polymorphic("area", &self.area)
        }
    }

    impl Deserializable for Survey {
        fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
            Ok(Self {
                area: ctx.read_polymorphic("area", &GEOMETRY_TYPES)?,
            })
        }
    }

    #[test]
    fn test_each_shape_round_trips() {
        let sync = SyncContext::current();
        for area in [
            Geometry::polygon(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]),
            Geometry::corridor(&[[0.0, 0.0], [2.5, 2.5]], 40.0),
            Geometry::point(47.6, -122.3, 15.0),
        ] {
            let survey = Survey { area: area.clone() };
            let text = codec::to_string(&survey, Default::default()).unwrap();
            assert!(text.contains(&format!("\"@type\":\"{}\"", area.type_name())));
            let back: Survey = codec::from_str(&text, &sync).unwrap();
            assert_eq!(back.area, area);
        }
    }

    #[test]
    fn test_nan_vertex_round_trips_without_conflict() {
        let sync = SyncContext::current();
        let area = Geometry::polygon(&[[f64::NAN, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let survey = Survey { area: area.clone() };
        let text = codec::to_string(&survey, Default::default()).unwrap();
        assert!(text.contains("NaN,0"));
        let back: Survey = codec::from_str(&text, &sync).unwrap();
        assert!(back.area.sync_eq(&area));

        let owner = PropertyOwner::new(&sync, "Mission m1");
        let mut tracked = TrackedValue::new(&owner, "area", area);
        tracked.mark_synced().unwrap();
        assert!(!tracked.is_dirty());

        let mut dry = DryRun::new();
        tracked.merge_value(&back.area, &mut dry).unwrap();
        assert!(!dry.has_conflicts());
        assert!(!tracked.is_dirty());
    }

    #[test]
    fn test_shapes_of_different_kinds_differ() {
        let point = Geometry::point(0.0, 0.0, 0.0);
        assert!(point.sync_eq(&point.clone()));
        assert!(!point.sync_eq(&Geometry::polygon(&[[0.0, 0.0]])));
        assert!(!Geometry::corridor(&[[0.0, 0.0]], 10.0)
            .sync_eq(&Geometry::corridor(&[[0.0, 0.0]], 12.0)));
    }

    #[test]
    fn test_negative_corridor_width_is_rejected() {
        let sync = SyncContext::current();
        let text = r#"{"area": {"@type": "Corridor", "path": ["0,0"], "width": -1}}"#;
        let err = codec::from_str::<Survey>(text, &sync).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            CodecError::InvalidValue { path, .. } if path == "area.width"
        ));
    }
}
