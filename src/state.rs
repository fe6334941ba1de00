//! # State Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides [`State`], the immutable snapshot used for world
//! states, goals, preconditions and effects.
//!
//! ## What is State in GOAP?
//!
//! A state maps world variable names to [`Value`]s. The planner uses states as:
//!
//! - **World State**: the start of a planning call, observed from the world
//! - **Goal State**: the conditions the agent wants to reach
//! - **Preconditions / Effects**: what an action needs and what it sets
//! - **Search states**: the partial sub-goals still owed during a regressive search
//!
//! ## Immutability
//!
//! Every "mutation" returns a new snapshot and leaves the receiver untouched,
//! so snapshots are shared freely across search nodes and threads. The hash
//! is computed once when a snapshot is built.
//!
//! ## Basic Usage
//!
//! ```
//! use regressive_goap::State;
//!
//! let current = State::empty()
//!     .set("isHungry", true)
//!     .set("gold", 5);
//!
//! let goal = State::empty().set("isHungry", false);
//!
//! // The goal is not satisfied yet
//! assert!(!current.is_superstate_of(&goal));
//!
//! // Applying an effect yields a new snapshot
//! let fed = current.apply(&State::empty().set("isHungry", false));
//! assert!(fed.is_superstate_of(&goal));
//! assert_eq!(current.get_or("isHungry", false), true);
//! ```

use crate::value::{FromValue, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

static EMPTY: OnceLock<State> = OnceLock::new();

/// An immutable world state snapshot.
///
/// Two snapshots are equal when they hold the same key-value pairs, no matter
/// how they were built.
///
/// # Examples
///
/// ```
/// use regressive_goap::State;
///
/// let a = State::empty().set("x", 1).set("y", true);
/// let b = State::empty().set("y", true).set("z", 3).set("x", 1).remove("z");
/// assert_eq!(a, b);
/// ```
#[derive(Clone)]
pub struct State {
    values: Arc<BTreeMap<String, Value>>,
    hash: u64,
}

impl State {
    /// Returns the shared empty snapshot.
    pub fn empty() -> Self {
        EMPTY.get_or_init(|| State::from_map(BTreeMap::new())).clone()
    }

    /// Same as [`State::empty`].
    pub fn new() -> Self {
        Self::empty()
    }

    fn from_map(values: BTreeMap<String, Value>) -> Self {
        let mut hasher = DefaultHasher::new();
        // BTreeMap iterates in key order, so equal contents hash equally
        for (key, value) in &values {
            key.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        Self {
            hash: hasher.finish(),
            values: Arc::new(values),
        }
    }

    /// Returns a new snapshot with `key` set to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use regressive_goap::State;
    ///
    /// let before = State::empty();
    /// let after = before.set("isNear", "Shop");
    /// assert!(before.is_empty());
    /// assert_eq!(after.get_or("isNear", String::new()), "Shop");
    /// ```
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if self.values.get(&key) == Some(&value) {
            return self.clone();
        }
        let mut values = (*self.values).clone();
        values.insert(key, value);
        Self::from_map(values)
    }

    /// Returns a new snapshot without `key`.
    pub fn remove(&self, key: &str) -> Self {
        if !self.values.contains_key(key) {
            return self.clone();
        }
        let mut values = (*self.values).clone();
        values.remove(key);
        Self::from_map(values)
    }

    /// Returns a new snapshot with every pair of `effects` set in turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use regressive_goap::State;
    ///
    /// let state = State::empty().set("hasWood", false).set("isTired", false);
    /// let effects = State::empty().set("hasWood", true).set("isNear", "Tree");
    ///
    /// let next = state.apply(&effects);
    /// assert_eq!(next.get_or("hasWood", false), true);
    /// assert_eq!(next.get_or("isTired", true), false);
    /// assert_eq!(next.len(), 3);
    /// ```
    pub fn apply(&self, effects: &State) -> Self {
        self.extend(effects.iter().map(|(k, v)| (k.to_string(), v.clone())))
    }

    /// Returns a new snapshot with all `pairs` set, later pairs winning.
    pub fn extend<K, V, I>(&self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut values = (*self.values).clone();
        let mut changed = false;
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            if values.get(&key) != Some(&value) {
                values.insert(key, value);
                changed = true;
            }
        }
        if changed {
            Self::from_map(values)
        } else {
            self.clone()
        }
    }

    /// Raw value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Typed value stored under `key`, or `None` when absent or of another type.
    pub fn try_get<T: FromValue>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(T::from_value)
    }

    /// Typed value stored under `key`, falling back to `default`.
    ///
    /// A value of a different type than `T` also yields `default`.
    pub fn get_or<T: FromValue>(&self, key: &str, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether this state holds `value` for `key`, treating an absent key as
    /// holding the default of its type.
    pub fn fulfills(&self, key: &str, value: &Value) -> bool {
        match self.values.get(key) {
            Some(current) => current == value,
            None => value.is_default(),
        }
    }

    /// Checks whether every requirement of `self` holds in `other`.
    ///
    /// A key of `self` holds when `other` has the same value for it, or when
    /// `other` lacks it and the value in `self` is a default (`false`, `0`).
    /// Defaults therefore double as "must be false" and "don't care".
    ///
    /// # Examples
    ///
    /// ```
    /// use regressive_goap::State;
    ///
    /// assert!(State::empty().set("k", false).is_substate_of(&State::empty()));
    /// assert!(!State::empty().set("k", true).is_substate_of(&State::empty()));
    /// ```
    pub fn is_substate_of(&self, other: &State) -> bool {
        if Arc::ptr_eq(&self.values, &other.values) {
            return true;
        }
        self.values
            .iter()
            .all(|(key, value)| other.fulfills(key, value))
    }

    /// Inverse of [`State::is_substate_of`].
    pub fn is_superstate_of(&self, other: &State) -> bool {
        other.is_substate_of(self)
    }

    /// Divergence between this state and `other`.
    ///
    /// Each key of `self` missing from `other` adds `1`, each key present with
    /// an unequal value adds [`Value::distance`]. Unless `one_way` is set, every
    /// key of `other` missing from `self` also adds `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use regressive_goap::State;
    ///
    /// let goal = State::empty().set("Gold", 10);
    /// let current = State::empty()
    ///     .set("Gold", 5)
    ///     .set("Silver", 5)
    ///     .set("HasCheated", true);
    ///
    /// assert!((goal.distance_to(&current, false) - 2.5).abs() < 1e-6);
    /// assert!((goal.distance_to(&current, true) - 0.5).abs() < 1e-6);
    /// ```
    pub fn distance_to(&self, other: &State, one_way: bool) -> f32 {
        let mut distance = 0.0;
        let mut shared = 0;

        for (key, value) in self.values.iter() {
            match other.values.get(key) {
                Some(other_value) => {
                    shared += 1;
                    distance += value.distance(other_value);
                }
                None => distance += 1.0,
            }
        }

        if !one_way {
            distance += (other.values.len() - shared) as f32;
        }

        distance
    }
}

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && (Arc::ptr_eq(&self.values, &other.values) || self.values == other.values)
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in self.values.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "({}: {})", key, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        State::empty().extend(iter)
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        BTreeMap::<String, Value>::deserialize(deserializer).map(State::from_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn hash_of(state: &State) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_empty_states_are_equal() {
        assert_eq!(State::empty(), State::new());
        assert_eq!(State::empty(), State::default());
        assert!(State::empty().is_empty());
    }

    #[test]
    fn test_set_does_not_touch_receiver() {
        let base = State::empty().set("key", 1);
        let changed = base.set("key", 2);
        assert_eq!(base.get_or("key", 0i64), 1);
        assert_eq!(changed.get_or("key", 0i64), 2);
        assert_ne!(base, changed);
    }

    #[test]
    fn test_same_values_are_equal() {
        let a = State::empty().set("key", 1);
        let b = State::empty().set("key", 1);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_set_then_remove_equals_direct() {
        let direct = State::empty().set("a", true);
        let roundabout = State::empty().set("b", 3).set("a", true).remove("b");
        assert_eq!(direct, roundabout);
        assert_eq!(hash_of(&direct), hash_of(&roundabout));

        let mut set = HashSet::new();
        set.insert(direct);
        assert!(set.contains(&roundabout));
    }

    #[test]
    fn test_get_or_and_try_get() {
        let state = State::empty().set("test123", 123).set("test321", true);
        assert_eq!(state.get_or("test123", 0i64), 123);
        assert!(state.get_or("test321", false));
        assert_eq!(state.get_or("missing", 7i64), 7);
        // wrong type falls back to the default
        assert_eq!(state.get_or("test321", 9i64), 9);
        assert_eq!(state.try_get::<bool>("test123"), None);
    }

    #[test]
    fn test_apply_effects() {
        let effects: State = [("test123", Value::from(123)), ("test321", Value::from(true))]
            .into_iter()
            .collect();
        let state = State::empty().apply(&effects);
        assert_eq!(state.get_or("test123", 0i64), 123);
        assert!(state.get_or("test321", false));
    }

    #[test]
    fn test_substate_of_bigger_state() {
        let big = State::empty()
            .set("key1", true)
            .set("key2", 4)
            .set("key3", 5.0f32);
        assert!(State::empty().is_substate_of(&big));

        let small = State::empty().set("key1", true).set("key3", 5.0f32);
        assert!(small.is_substate_of(&big));
        assert!(big.is_superstate_of(&small));
    }

    #[test]
    fn test_not_substate() {
        let big = State::empty()
            .set("key1", true)
            .set("key2", 4)
            .set("key3", 5.0f32);
        assert!(!big.is_substate_of(&State::empty()));

        let small = State::empty().set("key1", false);
        assert!(!small.is_substate_of(&big));
    }

    #[test]
    fn test_default_counts_as_absent() {
        assert!(State::empty().set("k", false).is_substate_of(&State::empty()));
        assert!(State::empty().set("k", 0).is_substate_of(&State::empty()));
        assert!(!State::empty().set("k", true).is_substate_of(&State::empty()));
        assert!(!State::empty().set("k", "Home").is_substate_of(&State::empty()));
    }

    #[test]
    fn test_fulfills() {
        let state = State::empty().set("isNear", "Shop");
        assert!(state.fulfills("isNear", &Value::from("Shop")));
        assert!(!state.fulfills("isNear", &Value::from("Home")));
        assert!(state.fulfills("isTired", &Value::from(false)));
        assert!(!state.fulfills("isTired", &Value::from(true)));
    }

    #[test]
    fn test_bool_distance() {
        let a = State::empty()
            .set("key1", true)
            .set("key2", false)
            .set("key3", true);
        let b = State::empty()
            .set("key1", true)
            .set("key2", true)
            .set("key3", false);
        assert_eq!(a.distance_to(&b, false), 2.0);
    }

    #[test]
    fn test_numeric_distance_per_type() {
        let pairs = [
            (Value::from(10), Value::from(5)),
            (Value::from(10i64), Value::from(5i64)),
            (Value::from(10.0f32), Value::from(5.0f32)),
            (Value::from(10.0f64), Value::from(5.0f64)),
        ];
        for (goal_value, current_value) in pairs {
            let goal = State::empty().set("Gold", goal_value);
            let current = State::empty().set("Gold", current_value);
            assert!((current.distance_to(&goal, false) - 0.5).abs() < 1e-2);
        }
    }

    #[test]
    fn test_one_way_distance() {
        let goal = State::empty().set("Gold", 10);
        let current = State::empty()
            .set("Gold", 5)
            .set("Silver", 5)
            .set("HasCheated", true);
        assert!((goal.distance_to(&current, false) - 2.5).abs() < 1e-2);
        assert!((goal.distance_to(&current, true) - 0.5).abs() < 1e-2);
        // missing keys on the right count one-way too
        assert_eq!(current.distance_to(&goal, true), 2.5);
    }

    #[test]
    fn test_display() {
        let state = State::empty().set("b", 2).set("a", true);
        assert_eq!(state.to_string(), "{(a: true), (b: 2)}");
        assert_eq!(State::empty().to_string(), "{}");
    }

    #[test]
    fn test_json_round_trip_shape() {
        let state: State = serde_json::from_str(r#"{"isNear": "Home", "gold": 3}"#).unwrap();
        assert_eq!(state, State::empty().set("gold", 3).set("isNear", "Home"));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"gold":3,"isNear":"Home"}"#);
    }

    fn arb_pairs() -> impl Strategy<Value = Vec<(String, i64)>> {
        prop::collection::btree_map("[a-e]{1,3}", any::<i64>(), 0..8)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #[test]
        fn insertion_order_does_not_change_identity(pairs in arb_pairs(), seed in any::<u64>()) {
            let forward: State = pairs.iter().cloned().collect();

            let mut shuffled = pairs.clone();
            let len = shuffled.len();
            if len > 1 {
                shuffled.rotate_left((seed as usize) % len);
                shuffled.reverse();
            }
            let backward: State = shuffled.into_iter().collect();

            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(hash_of(&forward), hash_of(&backward));
        }
    }
}
