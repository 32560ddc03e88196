//! Macros for seeding property stores.

/// Build a [`PropertyStore`](crate::properties::PropertyStore) from
/// `name => value` pairs.
///
/// Pairs that the store rejects (null values, a name repeated with a
/// different kind) are logged and skipped, exactly as `set` would.
///
/// # Example
///
/// ```
/// use statecraft::properties;
///
/// let store = properties! {
///     "chase_range" => 25.0_f32,
///     "attack_range" => 15.0_f32,
///     "missiles" => 4,
///     "call_sign" => "Kestrel",
/// };
///
/// assert_eq!(store.get::<f32>("chase_range"), 25.0);
/// assert_eq!(store.get::<i32>("missiles"), 4);
/// ```
#[macro_export]
macro_rules! properties {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut store = $crate::properties::PropertyStore::new();
        $(
            let _ = store.set($name, $value);
        )*
        store
    }};
}

#[cfg(test)]
mod tests {
    use crate::properties::PropertyKind;

    #[test]
    fn properties_macro_seeds_store() {
        let store = properties! {
            "speed" => 3.5_f32,
            "armed" => true,
        };

        assert_eq!(store.len(), 2);
        assert_eq!(store.get::<f32>("speed"), 3.5);
        assert!(store.get::<bool>("armed"));
    }

    #[test]
    fn properties_macro_skips_conflicting_kinds() {
        let store = properties! {
            "x" => 1,
            "x" => 2.0_f32,
        };

        assert_eq!(store.kind_of("x"), Some(PropertyKind::Int));
        assert_eq!(store.get::<i32>("x"), 1);
    }

    #[test]
    fn empty_properties_macro() {
        let store = properties! {};
        assert!(store.is_empty());
    }
}
