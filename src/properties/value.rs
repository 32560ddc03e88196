//! Tagged property values and the conversions into and out of them.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a game object owned by the host engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// A value held in a [`PropertyStore`](super::PropertyStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Absent value. Never stored; only produced when importing.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec2(Vec2),
    Vec3(Vec3),
    Text(String),
    Entity(EntityId),
}

/// The kind of a [`PropertyValue`], fixed per property name once stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Null,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Text,
    Entity,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Text => "text",
            Self::Entity => "entity",
        };
        f.write_str(name)
    }
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Null => PropertyKind::Null,
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Float(_) => PropertyKind::Float,
            Self::Vec2(_) => PropertyKind::Vec2,
            Self::Vec3(_) => PropertyKind::Vec3,
            Self::Text(_) => PropertyKind::Text,
            Self::Entity(_) => PropertyKind::Entity,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a JSON field into a property value.
    ///
    /// Numeric arrays of length two or three become vectors, matching how
    /// `glam` serialises them. Other arrays and objects have no property
    /// representation and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            // Integers beyond i64 keep their magnitude as floats.
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => {
                let components: Option<Vec<f32>> = items
                    .iter()
                    .map(|item| item.as_f64().map(|f| f as f32))
                    .collect();
                match components?.as_slice() {
                    [x, y] => Some(Self::Vec2(Vec2::new(*x, *y))),
                    [x, y, z] => Some(Self::Vec3(Vec3::new(*x, *y, *z))),
                    _ => None,
                }
            }
            Value::Object(_) => None,
        }
    }
}

/// A Rust type that can be read back out of the property store.
pub trait PropertyType: Sized + Default + Into<PropertyValue> {
    const KIND: PropertyKind;

    fn from_value(value: &PropertyValue) -> Option<Self>;
}

/// Property types that support `get_add_set` accumulation.
pub trait Numeric: PropertyType + Copy {
    /// Sum of `self` and `rhs`, or `None` when it does not fit.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! numeric {
    (int: $($ty:ty),*; float: $($fty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }
            }
        )*
        $(
            impl Numeric for $fty {
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }
            }
        )*
    };
}

numeric!(int: i32, i64; float: f32, f64);

macro_rules! property_type {
    ($ty:ty, $kind:ident, |$v:ident| $into:expr, |$p:ident| $from:expr) => {
        impl From<$ty> for PropertyValue {
            fn from($v: $ty) -> Self {
                $into
            }
        }

        impl PropertyType for $ty {
            const KIND: PropertyKind = PropertyKind::$kind;

            fn from_value(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$kind($p) => $from,
                    _ => None,
                }
            }
        }
    };
}

property_type!(bool, Bool, |v| PropertyValue::Bool(v), |b| Some(*b));
property_type!(i64, Int, |v| PropertyValue::Int(v), |i| Some(*i));
property_type!(i32, Int, |v| PropertyValue::Int(i64::from(v)), |i| {
    i32::try_from(*i).ok()
});
property_type!(f64, Float, |v| PropertyValue::Float(v), |f| Some(*f));
property_type!(f32, Float, |v| PropertyValue::Float(f64::from(v)), |f| {
    Some(*f as f32)
});
property_type!(Vec2, Vec2, |v| PropertyValue::Vec2(v), |v| Some(*v));
property_type!(Vec3, Vec3, |v| PropertyValue::Vec3(v), |v| Some(*v));
property_type!(String, Text, |v| PropertyValue::Text(v), |s| Some(s.clone()));
property_type!(EntityId, Entity, |v| PropertyValue::Entity(v), |e| Some(*e));

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(PropertyValue::from(3_i32).kind(), PropertyKind::Int);
        assert_eq!(PropertyValue::from(3.5_f32).kind(), PropertyKind::Float);
        assert_eq!(PropertyValue::from("x").kind(), PropertyKind::Text);
        assert_eq!(PropertyValue::from(Vec3::ONE).kind(), PropertyKind::Vec3);
        assert_eq!(PropertyValue::from(None::<f32>).kind(), PropertyKind::Null);
    }

    #[test]
    fn narrow_ints_reject_out_of_range_values() {
        let wide = PropertyValue::Int(i64::from(i32::MAX) + 1);
        assert_eq!(i32::from_value(&wide), None);
        assert_eq!(i64::from_value(&wide), Some(i64::from(i32::MAX) + 1));
    }

    #[test]
    fn ints_do_not_read_as_floats() {
        assert_eq!(f32::from_value(&PropertyValue::Int(5)), None);
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(PropertyValue::from_json(&json!(true)), Some(PropertyValue::Bool(true)));
        assert_eq!(PropertyValue::from_json(&json!(12)), Some(PropertyValue::Int(12)));
        assert_eq!(PropertyValue::from_json(&json!(2.5)), Some(PropertyValue::Float(2.5)));
        assert_eq!(
            PropertyValue::from_json(&json!("harrier")),
            Some(PropertyValue::Text("harrier".to_string()))
        );
        assert_eq!(PropertyValue::from_json(&json!(null)), Some(PropertyValue::Null));
    }

    #[test]
    fn json_numeric_arrays_become_vectors() {
        assert_eq!(
            PropertyValue::from_json(&json!([1.0, 2.0])),
            Some(PropertyValue::Vec2(Vec2::new(1.0, 2.0)))
        );
        assert_eq!(
            PropertyValue::from_json(&json!([1.0, 2.0, 3.0])),
            Some(PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(PropertyValue::from_json(&json!([1.0, 2.0, 3.0, 4.0])), None);
        assert_eq!(PropertyValue::from_json(&json!(["a", "b"])), None);
        assert_eq!(PropertyValue::from_json(&json!({ "x": 1 })), None);
    }
}
