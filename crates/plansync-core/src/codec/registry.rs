//! Explicit discriminator → constructor tables for polymorphic fields.

use super::error::{CodecError, Result};
use super::read::ReadContext;
use tracing::trace;

/// Constructor for one concrete type, producing the declared target type.
pub type Factory<T> = fn(&ReadContext<'_>) -> Result<T>;

/// Concrete types a polymorphic field of type `T` may hold.
///
/// Built once per target type, typically in a `LazyLock` static:
///
/// ```
/// use plansync_core::codec::{ReadContext, TypeRegistry};
/// use std::sync::LazyLock;
///
/// enum Shape {
///     Circle(f64),
///     Square(f64),
/// }
///
/// static SHAPES: LazyLock<TypeRegistry<Shape>> = LazyLock::new(|| {
///     TypeRegistry::new("Shape")
///         .with_candidate("Circle", |ctx| Ok(Shape::Circle(ctx.read_value("radius")?)))
///         .with_candidate("Square", |ctx| Ok(Shape::Square(ctx.read_value("side")?)))
/// });
/// # assert_eq!(SHAPES.target(), "Shape");
/// ```
pub struct TypeRegistry<T> {
    target: &'static str,
    factories: Vec<(&'static str, Factory<T>)>,
}

impl<T> TypeRegistry<T> {
    pub fn new(target: &'static str) -> Self {
        Self {
            target: simple_name(target),
            factories: Vec::new(),
        }
    }

    /// Constructor for objects tagged with the target type itself, or untagged.
    pub fn with_target(self, factory: Factory<T>) -> Self {
        let target = self.target;
        self.with_candidate(target, factory)
    }

    pub fn with_candidate(mut self, name: &'static str, factory: Factory<T>) -> Self {
        self.factories.push((simple_name(name), factory));
        self
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn candidates(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|(name, _)| *name)
    }

    /// Construct the concrete type named by the object's discriminator.
    ///
    /// Names compare by simple name. An untagged object is accepted only if a
    /// constructor is registered under the target name.
    pub fn resolve(&self, ctx: &ReadContext<'_>) -> Result<T> {
        let discriminator = ctx.discriminator()?;
        let name = discriminator.map(simple_name).unwrap_or(self.target);

        let Some((name, factory)) = self.factories.iter().find(|(candidate, _)| *candidate == name)
        else {
            return Err(match discriminator {
                Some(discriminator) => CodecError::UnknownType {
                    path: ctx.path().to_string(),
                    discriminator: discriminator.to_string(),
                    target: self.target,
                },
                None => CodecError::MissingDiscriminator {
                    path: ctx.path().to_string(),
                    target: self.target,
                },
            });
        };

        trace!("Resolved {} at {} as {}", self.target, ctx.path(), name);
        factory(ctx).map_err(|e| CodecError::Construction {
            type_name: name.to_string(),
            path: ctx.path().to_string(),
            source: Box::new(e),
        })
    }
}

/// Last segment of a qualified type name: `a::b::Polygon` and `com.x.Polygon`
/// both give `Polygon`.
pub fn simple_name(name: &str) -> &str {
    name.rsplit([':', '.']).next().unwrap_or(name)
}
