//! Keyed, kind-checked property storage.
//!
//! Each machine carries a `PropertyStore` for per-agent tunables (ranges,
//! speeds, cooldown lengths) and runtime scratch values (cooldown timers,
//! remembered positions). Values are a tagged [`PropertyValue`]; a name keeps
//! the kind it was first stored with for the lifetime of the store.
//!
//! # Failure Model
//!
//! Misuse never panics. Writes of the wrong kind or of null values are
//! rejected and logged; reads of missing or mismatched names log a warning
//! and fall back to the type's default.
//!
//! # Example
//!
//! ```rust
//! use statecraft::PropertyStore;
//!
//! let mut store = PropertyStore::new();
//! store.set("attack_range", 12.5_f32).unwrap();
//! assert_eq!(store.get::<f32>("attack_range"), 12.5);
//!
//! // A cooldown that starts at zero and counts down each frame.
//! store.get_add_set("cooldown", -0.5_f32);
//! assert_eq!(store.get_add_set("cooldown", -0.5_f32), -1.0);
//!
//! // Kind is fixed once stored.
//! assert!(store.set("attack_range", 3_i32).is_err());
//! ```

mod error;
mod macros;
mod value;

pub use error::PropertyError;
pub use value::{EntityId, Numeric, PropertyKind, PropertyType, PropertyValue};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// String-keyed store of [`PropertyValue`]s.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyStore {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`.
    ///
    /// Rejected (logged, store unchanged) when `value` is null or `name`
    /// already holds a value of a different kind.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<(), PropertyError> {
        self.set_value(name, value.into())
    }

    pub fn set_value(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        if value.is_null() {
            return Err(warned(PropertyError::NullValue {
                name: name.to_string(),
            }));
        }

        if let Some(existing) = self.values.get(name) {
            if existing.kind() != value.kind() {
                return Err(warned(PropertyError::TypeMismatch {
                    name: name.to_string(),
                    expected: existing.kind(),
                    found: value.kind(),
                }));
            }
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Read `name` as `T`.
    pub fn try_get<T: PropertyType>(&self, name: &str) -> Result<T, PropertyError> {
        let value = self.values.get(name).ok_or_else(|| PropertyError::Missing {
            name: name.to_string(),
        })?;

        T::from_value(value).ok_or_else(|| read_error::<T>(name, value))
    }

    /// Read `name` as `T`, falling back to `T::default()` with a warning.
    pub fn get<T: PropertyType>(&self, name: &str) -> T {
        self.try_get(name).unwrap_or_else(|err| {
            warned(err);
            T::default()
        })
    }

    /// Read `name` as `T` without logging when it is missing or mismatched.
    pub fn get_or<T: PropertyType>(&self, name: &str, fallback: T) -> T {
        self.try_get(name).unwrap_or(fallback)
    }

    /// Add `delta` to the numeric value under `name` and return the sum.
    ///
    /// A missing name starts from zero. A name holding another kind, or a
    /// value the type cannot hold, is left untouched and zero is returned.
    /// An integer sum that would overflow is not stored; the current value
    /// is returned instead.
    pub fn get_add_set<T: Numeric>(&mut self, name: &str, delta: T) -> T {
        let current = match self.values.get(name) {
            None => T::default(),
            Some(value) => match T::from_value(value) {
                Some(current) => current,
                None => {
                    warned(read_error::<T>(name, value));
                    return T::default();
                }
            },
        };

        let Some(next) = current.checked_add(delta) else {
            warned(PropertyError::Overflow {
                name: name.to_string(),
            });
            return current;
        };
        self.values.insert(name.to_string(), next.into());
        next
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        self.values.get(name).map(PropertyValue::kind)
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Copy every field of a serialisable tunables struct into the store,
    /// keyed by field name. Returns how many fields were stored.
    ///
    /// Fields that cannot be represented (nested structs, non-numeric
    /// arrays, `None`) or that clash with an existing kind are skipped with
    /// a warning. Only a source that is not a struct or map is an error.
    ///
    /// ```rust
    /// use serde::Serialize;
    /// use statecraft::PropertyStore;
    ///
    /// #[derive(Serialize)]
    /// struct HarrierTunables {
    ///     chase_range: f32,
    ///     missiles: i32,
    ///     call_sign: String,
    /// }
    ///
    /// let mut store = PropertyStore::new();
    /// let imported = store
    ///     .import_properties(&HarrierTunables {
    ///         chase_range: 25.0,
    ///         missiles: 4,
    ///         call_sign: "Kestrel".to_string(),
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(imported, 3);
    /// assert_eq!(store.get::<i32>("missiles"), 4);
    /// ```
    pub fn import_properties<T: Serialize + ?Sized>(
        &mut self,
        source: &T,
    ) -> Result<usize, PropertyError> {
        let json = serde_json::to_value(source)
            .map_err(|err| PropertyError::Serialization(err.to_string()))?;

        let fields = match json {
            serde_json::Value::Object(fields) => fields,
            other => return Err(warned(PropertyError::NotAnObject(json_shape(&other)))),
        };

        let mut imported = 0;
        for (name, field) in &fields {
            match PropertyValue::from_json(field) {
                Some(value) => {
                    if self.set_value(name, value).is_ok() {
                        imported += 1;
                    }
                }
                None => {
                    warned(PropertyError::Unsupported {
                        name: name.clone(),
                        shape: json_shape(field),
                    });
                }
            }
        }

        Ok(imported)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Why `value` could not be read as `T`.
fn read_error<T: PropertyType>(name: &str, value: &PropertyValue) -> PropertyError {
    if value.kind() == T::KIND {
        PropertyError::OutOfRange {
            name: name.to_string(),
            kind: T::KIND,
        }
    } else {
        PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: T::KIND,
            found: value.kind(),
        }
    }
}

fn warned(err: PropertyError) -> PropertyError {
    warn!(error = %err, "property store misuse");
    err
}

fn json_shape(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use serde::Serialize;

    #[test]
    fn set_then_get_returns_value() {
        let mut store = PropertyStore::new();
        store.set("speed", 7.5_f32).unwrap();
        store.set("armed", true).unwrap();
        store.set("home", Vec3::new(1.0, 0.0, -2.0)).unwrap();
        store.set("call_sign", "Kestrel").unwrap();
        store.set("target", EntityId(42)).unwrap();

        assert_eq!(store.get::<f32>("speed"), 7.5);
        assert!(store.get::<bool>("armed"));
        assert_eq!(store.get::<Vec3>("home"), Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(store.get::<String>("call_sign"), "Kestrel");
        assert_eq!(store.get::<EntityId>("target"), EntityId(42));
    }

    #[test]
    fn overwriting_with_same_kind_succeeds() {
        let mut store = PropertyStore::new();
        store.set("ammo", 5_i32).unwrap();
        store.set("ammo", 3_i32).unwrap();

        assert_eq!(store.get::<i32>("ammo"), 3);
    }

    #[test]
    fn set_with_different_kind_is_rejected() {
        let mut store = PropertyStore::new();
        store.set("x", 5_i32).unwrap();

        let result = store.set("x", 1.0_f32);

        assert_eq!(
            result,
            Err(PropertyError::TypeMismatch {
                name: "x".to_string(),
                expected: PropertyKind::Int,
                found: PropertyKind::Float,
            })
        );
        assert_eq!(store.get::<i32>("x"), 5);
    }

    #[test]
    fn null_values_are_rejected() {
        let mut store = PropertyStore::new();

        let result = store.set("target", None::<EntityId>);

        assert!(matches!(result, Err(PropertyError::NullValue { .. })));
        assert!(!store.has_value("target"));
    }

    #[test]
    fn missing_property_reads_default() {
        let store = PropertyStore::new();

        assert_eq!(store.get::<f32>("nope"), 0.0);
        assert!(matches!(
            store.try_get::<f32>("nope"),
            Err(PropertyError::Missing { .. })
        ));
        assert_eq!(store.get_or("nope", 3.0_f32), 3.0);
    }

    #[test]
    fn mismatched_read_returns_default() {
        let mut store = PropertyStore::new();
        store.set("name", "Torosaurus").unwrap();

        assert_eq!(store.get::<i32>("name"), 0);
        assert!(matches!(
            store.try_get::<i32>("name"),
            Err(PropertyError::TypeMismatch {
                expected: PropertyKind::Int,
                found: PropertyKind::Text,
                ..
            })
        ));
    }

    #[test]
    fn get_add_set_starts_from_zero() {
        let mut store = PropertyStore::new();

        assert_eq!(store.get_add_set("timer", -0.25_f32), -0.25);
        assert_eq!(store.get_add_set("timer", -0.25_f32), -0.5);
        assert_eq!(store.get::<f32>("timer"), -0.5);
    }

    #[test]
    fn get_add_set_leaves_other_kinds_alone() {
        let mut store = PropertyStore::new();
        store.set("timer", "not a number").unwrap();

        assert_eq!(store.get_add_set("timer", 1_i32), 0);
        assert_eq!(store.get::<String>("timer"), "not a number");
    }

    #[test]
    fn get_add_set_refuses_to_overflow() {
        let mut store = PropertyStore::new();
        store.set("hits", i32::MAX).unwrap();

        assert_eq!(store.get_add_set("hits", 1_i32), i32::MAX);
        assert_eq!(store.get::<i32>("hits"), i32::MAX);

        store.set("kills", i64::MIN).unwrap();
        assert_eq!(store.get_add_set("kills", -1_i64), i64::MIN);
        assert_eq!(store.get_add_set("kills", 1_i64), i64::MIN + 1);
    }

    #[test]
    fn narrow_read_of_wide_int_reports_range() {
        let mut store = PropertyStore::new();
        store.set("score", i64::from(i32::MAX) + 1).unwrap();

        assert_eq!(
            store.try_get::<i32>("score"),
            Err(PropertyError::OutOfRange {
                name: "score".to_string(),
                kind: PropertyKind::Int,
            })
        );
        assert_eq!(store.get_add_set("score", 1_i32), 0);
        assert_eq!(store.get::<i64>("score"), i64::from(i32::MAX) + 1);
        assert_eq!(store.get_add_set("score", 1_i64), i64::from(i32::MAX) + 2);
    }

    #[test]
    fn vec2_reads_back() {
        let mut store = PropertyStore::new();
        store.set("waypoint", Vec2::new(4.0, -1.5)).unwrap();

        assert_eq!(store.kind_of("waypoint"), Some(PropertyKind::Vec2));
        assert_eq!(store.get::<Vec2>("waypoint"), Vec2::new(4.0, -1.5));
    }

    #[test]
    fn has_value_is_pure() {
        let mut store = PropertyStore::new();
        assert!(!store.has_value("range"));
        assert!(!store.has_value("range"));

        store.set("range", 10.0_f32).unwrap();
        assert!(store.has_value("range"));
        assert_eq!(store.kind_of("range"), Some(PropertyKind::Float));
        assert_eq!(store.len(), 1);
    }

    #[derive(Serialize)]
    struct TankylosaurusTunables {
        charge_speed: f32,
        tail_swipe_range: f32,
        armour_plates: i32,
        roar_position: Vec3,
        nickname: Option<String>,
        gait: Gait,
    }

    #[derive(Serialize)]
    struct Gait {
        stride: f32,
    }

    #[test]
    fn import_copies_representable_fields() {
        let mut store = PropertyStore::new();
        let tunables = TankylosaurusTunables {
            charge_speed: 14.0,
            tail_swipe_range: 6.5,
            armour_plates: 12,
            roar_position: Vec3::new(0.0, 1.0, 2.0),
            nickname: None,
            gait: Gait { stride: 2.0 },
        };

        let imported = store.import_properties(&tunables).unwrap();

        assert_eq!(imported, 4);
        assert_eq!(store.get::<f32>("charge_speed"), 14.0);
        assert_eq!(store.get::<f32>("tail_swipe_range"), 6.5);
        assert_eq!(store.get::<i32>("armour_plates"), 12);
        assert_eq!(store.get::<Vec3>("roar_position"), Vec3::new(0.0, 1.0, 2.0));
        assert!(!store.has_value("nickname"));
        assert!(!store.has_value("gait"));
    }

    #[test]
    fn import_respects_existing_kinds() {
        let mut store = PropertyStore::new();
        store.set("charge_speed", 3_i32).unwrap();

        #[derive(Serialize)]
        struct Partial {
            charge_speed: f32,
        }

        let imported = store.import_properties(&Partial { charge_speed: 9.0 }).unwrap();

        assert_eq!(imported, 0);
        assert_eq!(store.get::<i32>("charge_speed"), 3);
    }

    #[test]
    fn import_rejects_non_struct_sources() {
        let mut store = PropertyStore::new();

        let result = store.import_properties(&[1, 2, 3]);

        assert_eq!(result, Err(PropertyError::NotAnObject("array")));
    }

    #[test]
    fn store_serializes_correctly() {
        let mut store = PropertyStore::new();
        store.set("speed", 2.0_f32).unwrap();
        store.set("armed", false).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let deserialized: PropertyStore = serde_json::from_str(&json).unwrap();

        assert_eq!(store, deserialized);
    }
}
