//! Self-describing document codec for entity graphs.
//!
//! Entities write their own fields through a [`WriteContext`] and read them
//! back through a [`ReadContext`] in their constructor. Writing streams
//! straight to the output; reading parses the document once into a tree so
//! fields can be pulled in any order.
//!
//! Polymorphic members carry their concrete type under the `@type` key and are
//! resolved on read through a [`TypeRegistry`].

mod error;
mod read;
mod registry;
mod value;
mod write;

pub use error::{CodecError, Result};
pub use read::ReadContext;
pub use registry::{Factory, TypeRegistry, simple_name};
pub use value::{Scalar, WireEnum, WireValue};
pub use write::WriteContext;

use crate::context::SyncContext;
use serde_json::Value;
use std::io;
use tracing::debug;

/// Key of the type discriminator member.
pub const TYPE_KEY: &str = "@type";

/// An entity that writes its own fields.
pub trait Serializable {
    /// Write every member of this object into `ctx`.
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<()>;

    /// Concrete type name written as the discriminator of polymorphic members.
    fn type_name(&self) -> &'static str {
        simple_name(std::any::type_name::<Self>())
    }
}

/// An entity constructed from its own fields.
pub trait Deserializable: Sized {
    fn from_context(ctx: &ReadContext<'_>) -> Result<Self>;
}

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Indent nested members (two spaces) instead of writing one line.
    pub pretty: bool,
}

impl CodecOptions {
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Stream `root` into `out`.
pub fn to_writer<T: Serializable + ?Sized>(
    out: &mut dyn io::Write,
    root: &T,
    options: CodecOptions,
) -> Result<()> {
    WriteContext::new(out, options).root(root)
}

pub fn to_vec<T: Serializable + ?Sized>(root: &T, options: CodecOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_writer(&mut buf, root, options)?;
    Ok(buf)
}

pub fn to_string<T: Serializable + ?Sized>(root: &T, options: CodecOptions) -> Result<String> {
    let buf = to_vec(root, options)?;
    String::from_utf8(buf).map_err(|e| CodecError::invalid(read::ROOT, e.to_string()))
}

/// Parse a document and construct its root entity bound to `sync`.
pub fn from_slice<T: Deserializable>(bytes: &[u8], sync: &SyncContext) -> Result<T> {
    let tree: Value = serde_json::from_slice(bytes).map_err(CodecError::Malformed)?;
    debug!("Parsed document ({} bytes)", bytes.len());
    T::from_context(&ReadContext::root(&tree, sync)?)
}

pub fn from_str<T: Deserializable>(text: &str, sync: &SyncContext) -> Result<T> {
    from_slice(text.as_bytes(), sync)
}

pub fn from_reader<T: Deserializable>(reader: impl io::Read, sync: &SyncContext) -> Result<T> {
    let tree: Value = serde_json::from_reader(reader).map_err(CodecError::Malformed)?;
    T::from_context(&ReadContext::root(&tree, sync)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use std::sync::LazyLock;
    use uuid::Uuid;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Status {
        Draft,
        Flown,
    }

    impl WireEnum for Status {
        fn name(&self) -> &'static str {
            match self {
                Status::Draft => "Draft",
                Status::Flown => "Flown",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "Draft" => Some(Status::Draft),
                "Flown" => Some(Status::Flown),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Circle { center: [f64; 2], radius: f64 },
        Line { points: Vec<[f64; 2]> },
    }

    impl Serializable for Shape {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<()> {
            match self {
                Shape::Circle { center, radius } => {
                    ctx.write_value("center", center)?;
                    ctx.write_value("radius", radius)
                }
                Shape::Line { points } => ctx.write_value_list("points", points),
            }
        }

        fn type_name(&self) -> &'static str {
            match self {
                Shape::Circle { .. } => "Circle",
                Shape::Line { .. } => "Line",
            }
        }
    }

    static SHAPES: LazyLock<TypeRegistry<Shape>> = LazyLock::new(|| {
        TypeRegistry::new("Shape")
            .with_candidate("Circle", |ctx| {
                Ok(Shape::Circle {
                    center: ctx.read_value("center")?,
                    radius: ctx.read_value("radius")?,
                })
            })
            .with_candidate("Line", |ctx| {
                Ok(Shape::Line {
                    points: ctx.read_value_list("points")?,
                })
            })
    });

    #[derive(Debug, Clone, PartialEq)]
    struct Waypoint {
        id: Uuid,
        name: String,
        altitude: f64,
        speed: f32,
        hold: i16,
        status: Status,
        at: DateTime<FixedOffset>,
        note: Option<String>,
        photo: Vec<u8>,
        area: Shape,
    }

    impl Serializable for Waypoint {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<()> {
            ctx.write_value("id", &self.id)?;
            ctx.write_value("name", &self.name)?;
            ctx.write_value("altitude", &self.altitude)?;
            ctx.write_value("speed", &self.speed)?;
            ctx.write_value("hold", &self.hold)?;
            ctx.write_enum("status", &self.status)?;
            ctx.write_value("at", &self.at)?;
            ctx.write_value("note", &self.note)?;
            ctx.write_bytes("photo", &self.photo)?;
            ctx.write_polymorphic("area", &self.area)
        }
    }

    impl Deserializable for Waypoint {
        fn from_context(ctx: &ReadContext<'_>) -> Result<Self> {
            Ok(Self {
                area: ctx.read_polymorphic("area", &SHAPES)?,
                photo: ctx.read_bytes("photo")?,
                note: ctx.read_optional("note")?,
                at: ctx.read_value("at")?,
                status: ctx.read_enum("status")?,
                hold: ctx.read_value("hold")?,
                speed: ctx.read_value("speed")?,
                altitude: ctx.read_value("altitude")?,
                name: ctx.read_value("name")?,
                id: ctx.read_value("id")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Route {
        name: String,
        waypoints: Vec<Waypoint>,
        shapes: Vec<Shape>,
    }

    impl Serializable for Route {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<()> {
            ctx.write_value("name", &self.name)?;
            ctx.write_list("waypoints", &self.waypoints)?;
            ctx.write_polymorphic_list("shapes", &self.shapes)
        }
    }

    impl Deserializable for Route {
        fn from_context(ctx: &ReadContext<'_>) -> Result<Self> {
            Ok(Self {
                name: ctx.read_value("name")?,
                waypoints: ctx.read_list("waypoints")?,
                shapes: ctx.read_polymorphic_list("shapes", &SHAPES)?,
            })
        }
    }

    fn waypoint(name: &str) -> Waypoint {
        Waypoint {
            id: Uuid::new_v4(),
            name: name.to_string(),
            altitude: 120.5,
            speed: 8.25,
            hold: -3,
            status: Status::Flown,
            at: DateTime::parse_from_rfc3339("2024-05-01T09:30:00+02:00").unwrap(),
            note: None,
            photo: vec![0, 1, 2, 250, 255],
            area: Shape::Circle {
                center: [47.5, -122.25],
                radius: 30.0,
            },
        }
    }

    fn route() -> Route {
        Route {
            name: "Survey".into(),
            waypoints: vec![waypoint("a"), waypoint("b")],
            shapes: vec![
                Shape::Line {
                    points: vec![[0.0, 0.0], [1.0, 1.5]],
                },
                Shape::Circle {
                    center: [0.0, 0.0],
                    radius: 1.0,
                },
            ],
        }
    }

    fn sync() -> SyncContext {
        SyncContext::current()
    }

    #[test]
    fn test_graph_survives_a_round_trip() {
        let route = route();
        for options in [CodecOptions::compact(), CodecOptions::pretty()] {
            let text = to_string(&route, options).unwrap();
            let back: Route = from_str(&text, &sync()).unwrap();
            assert_eq!(back, route);
        }
    }

    #[test]
    fn test_document_shape() {
        let text = to_string(&route(), CodecOptions::compact()).unwrap();
        let tree: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(tree["shapes"][0]["@type"], "Line");
        assert_eq!(tree["shapes"][0]["points"][1], "1,1.5");
        assert_eq!(tree["waypoints"][0]["area"]["@type"], "Circle");
        assert_eq!(tree["waypoints"][0]["status"], "Flown");
        assert_eq!(tree["waypoints"][0]["at"], "2024-05-01T09:30:00+02:00");
        assert_eq!(tree["waypoints"][0]["photo"], "AAEC+v8=");
        assert!(tree["waypoints"][0]["note"].is_null());
        assert!(tree["waypoints"][0].get("@type").is_none());
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let text = to_string(&route(), CodecOptions::pretty()).unwrap();
        assert!(text.starts_with("{\n  \"name\": \"Survey\","));
        let compact = to_string(&route(), CodecOptions::compact()).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_fields_read_in_any_order() {
        let text = r#"{
            "shapes": [{"radius": 2, "@type": "Circle", "center": "1,2"}],
            "waypoints": [],
            "name": "Reordered"
        }"#;
        let route: Route = from_str(text, &sync()).unwrap();
        assert_eq!(route.name, "Reordered");
        assert_eq!(
            route.shapes,
            vec![Shape::Circle {
                center: [1.0, 2.0],
                radius: 2.0
            }]
        );
    }

    #[test]
    fn test_missing_field_reports_path() {
        let text = r#"{"name": "x", "waypoints": [], "shapes": [{"@type": "Line"}]}"#;
        let err = from_str::<Route>(text, &sync()).unwrap_err();

        let CodecError::Construction { type_name, path, .. } = &err else {
            panic!("expected construction error, got {err}");
        };
        assert_eq!(type_name, "Line");
        assert_eq!(path, "shapes[0]");
        assert!(matches!(
            err.root_cause(),
            CodecError::MissingField { path } if path == "shapes[0].points"
        ));
    }

    #[test]
    fn test_structural_mismatch() {
        let text = r#"{"name": 3, "waypoints": [], "shapes": []}"#;
        let err = from_str::<Route>(text, &sync()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch { expected: "string", found: "number", .. }
        ));

        let text = r#"{"name": "x", "waypoints": {}, "shapes": []}"#;
        let err = from_str::<Route>(text, &sync()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch { ref path, expected: "array", .. } if path == "waypoints"
        ));

        let err = from_str::<Route>("[1, 2]", &sync()).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_malformed_document() {
        let err = from_str::<Route>("{\"name\": ", &sync()).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_unknown_discriminator() {
        let text = r#"{"name": "x", "waypoints": [], "shapes": [{"@type": "Hexagon"}]}"#;
        let err = from_str::<Route>(text, &sync()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownType { ref discriminator, target: "Shape", .. }
                if discriminator == "Hexagon"
        ));
    }

    #[test]
    fn test_qualified_discriminator_resolves_by_simple_name() {
        let text = r#"{"name": "x", "waypoints": [],
            "shapes": [{"@type": "com.acme.geo.Circle", "center": "0,0", "radius": 1}]}"#;
        let route: Route = from_str(text, &sync()).unwrap();
        assert_eq!(route.shapes.len(), 1);
    }

    #[test]
    fn test_missing_discriminator_without_target_factory() {
        let text = r#"{"name": "x", "waypoints": [], "shapes": [{"radius": 1}]}"#;
        let err = from_str::<Route>(text, &sync()).unwrap_err();
        assert!(matches!(err, CodecError::MissingDiscriminator { target: "Shape", .. }));
    }

    #[test]
    fn test_missing_discriminator_falls_back_to_target() {
        static SHAPE_OR_CIRCLE: LazyLock<TypeRegistry<Shape>> = LazyLock::new(|| {
            TypeRegistry::new("Shape").with_target(|ctx| {
                Ok(Shape::Circle {
                    center: [0.0, 0.0],
                    radius: ctx.read_value("radius")?,
                })
            })
        });

        let tree: Value = serde_json::from_str(r#"{"radius": 4}"#).unwrap();
        let sync = sync();
        let ctx = ReadContext::root(&tree, &sync).unwrap();
        let shape = SHAPE_OR_CIRCLE.resolve(&ctx).unwrap();
        assert!(matches!(shape, Shape::Circle { radius, .. } if radius == 4.0));
    }

    #[test]
    fn test_mime_wrapped_bytes() {
        let photo: Vec<u8> = (0..=255).collect();
        let mut point = waypoint("wrapped");
        point.photo = photo.clone();
        let text = to_string(&point, CodecOptions::compact()).unwrap();

        let mut tree: Value = serde_json::from_str(&text).unwrap();
        let encoded = tree["photo"].as_str().unwrap().to_string();
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        tree["photo"] = Value::String(wrapped);

        let back: Waypoint = from_str(&tree.to_string(), &sync()).unwrap();
        assert_eq!(back.photo, photo);
    }

    #[test]
    fn test_invalid_enum_and_width() {
        let text = to_string(&waypoint("w"), CodecOptions::compact()).unwrap();
        let mut tree: Value = serde_json::from_str(&text).unwrap();
        tree["status"] = Value::String("Crashed".into());
        let err = from_str::<Waypoint>(&tree.to_string(), &sync()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value at status: unknown variant 'Crashed'");

        tree["status"] = Value::String("Draft".into());
        tree["hold"] = serde_json::json!(40000);
        let err = from_str::<Waypoint>(&tree.to_string(), &sync()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { ref path, .. } if path == "hold"));
    }

    #[test]
    fn test_non_finite_values_round_trip() {
        let mut point = waypoint("nan");
        point.altitude = f64::INFINITY;
        let text = to_string(&point, CodecOptions::compact()).unwrap();
        assert!(text.contains("\"altitude\":\"Infinity\""));
        let back: Waypoint = from_str(&text, &sync()).unwrap();
        assert_eq!(back.altitude, f64::INFINITY);
    }

    #[test]
    fn test_default_type_name_is_simple() {
        struct Marker;
        impl Serializable for Marker {
            fn write_fields(&self, _ctx: &mut WriteContext<'_>) -> Result<()> {
                Ok(())
            }
        }
        assert_eq!(Marker.type_name(), "Marker");
    }
}
