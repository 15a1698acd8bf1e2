/// Calibration registry
///
/// Holds every calibration profile of the session and enforces that at most
/// one of them is active. Consumers subscribe to change events instead of
/// polling the list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::conversion;
use super::profile::{
    Axis, CalibrationId, CalibrationInput, CalibrationProfile, PixelPoint, RatioInfo,
};
use crate::config::CalibrationConfig;
use crate::error::{CalibrationError, Result};

/// How many profiles `add` keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionPolicy {
    /// Keep the `n` most recently added profiles, evicting older ones
    KeepMostRecent(usize),
    Unbounded,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::KeepMostRecent(2)
    }
}

/// Change notification delivered to subscribers after a mutation completes
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationEvent {
    Added(CalibrationProfile),
    /// Dropped by the retention policy during an `add`
    Evicted(CalibrationProfile),
    Activated(CalibrationProfile),
    Removed {
        profile: CalibrationProfile,
        was_active: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&CalibrationEvent)>;

/// In-memory calibration registry, newest profile first
pub struct CalibrationStore {
    profiles: Vec<CalibrationProfile>,
    retention: RetentionPolicy,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CalibrationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationStore")
            .field("profiles", &self.profiles)
            .field("retention", &self.retention)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CalibrationStore {
    /// Empty registry with the default retention policy
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
            retention: RetentionPolicy::default(),
            next_id: 1,
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Registry with `retention`; `KeepMostRecent(0)` is raised to 1 so `add`
    /// never evicts the profile it just inserted
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        let retention = match retention {
            RetentionPolicy::KeepMostRecent(0) => {
                log::warn!("Retention of 0 profiles raised to 1");
                RetentionPolicy::KeepMostRecent(1)
            }
            other => other,
        };
        Self {
            retention,
            ..Self::new()
        }
    }

    /// Registry configured from `config`, seeded with the sample profiles if requested
    pub fn with_config(config: &CalibrationConfig) -> Self {
        let mut store = Self::with_retention(config.retention);
        if config.seed_sample_profiles {
            store.seed_samples();
        }
        store
    }

    fn seed_samples(&mut self) {
        let samples = [
            ("100X", 0.5, NaiveDate::from_ymd_opt(2024, 1, 15)),
            ("200X", 0.25, NaiveDate::from_ymd_opt(2024, 1, 14)),
        ];
        for (label, ratio, date) in samples {
            let Some(created_date) = date else { continue };
            let id = self.allocate_id();
            self.profiles.push(CalibrationProfile::from_input(
                id,
                CalibrationInput {
                    magnification_label: label.to_string(),
                    x_axis_ratio: ratio,
                    y_axis_ratio: ratio,
                    unit: "µm/pixel".to_string(),
                    created_date,
                },
            ));
        }
        log::debug!("Seeded {} sample calibrations", self.profiles.len());
    }

    fn allocate_id(&mut self) -> CalibrationId {
        let id = CalibrationId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Read surface ──

    pub fn list(&self) -> &[CalibrationProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, id: CalibrationId) -> Option<&CalibrationProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn get_active(&self) -> Option<&CalibrationProfile> {
        self.profiles.iter().find(|p| p.is_active)
    }

    pub fn is_active(&self) -> bool {
        self.get_active().is_some()
    }

    /// Ratio of the active profile along `axis`
    pub fn ratio(&self, axis: Axis) -> Option<f64> {
        self.get_active().map(|p| p.ratio(axis))
    }

    pub fn ratio_info(&self) -> Option<RatioInfo> {
        self.get_active().map(|p| RatioInfo {
            x: p.x_axis_ratio,
            y: p.y_axis_ratio,
            unit: p.unit.clone(),
        })
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    // ── Conversion surface ──

    pub fn pixels_to_units(&self, pixels: f64, axis: Axis) -> Option<f64> {
        conversion::pixels_to_units(pixels, self.ratio(axis))
    }

    pub fn units_to_pixels(&self, units: f64, axis: Axis) -> Option<f64> {
        conversion::units_to_pixels(units, self.ratio(axis))
    }

    /// Physical length of the segment between two pixel points
    pub fn measure(&self, from: PixelPoint, to: PixelPoint) -> Option<f64> {
        let active = self.get_active()?;
        Some(conversion::distance_to_units(
            to.x - from.x,
            to.y - from.y,
            active.x_axis_ratio,
            active.y_axis_ratio,
        ))
    }

    // ── Write surface ──

    /// Register a new inactive profile at the front of the list.
    ///
    /// Both ratios must be finite and positive. Applies the retention policy
    /// afterwards; with the default policy only the two most recent profiles
    /// survive.
    pub fn add(&mut self, input: CalibrationInput) -> Result<CalibrationProfile> {
        for (axis, value) in [(Axis::X, input.x_axis_ratio), (Axis::Y, input.y_axis_ratio)] {
            if !value.is_finite() || value <= 0.0 {
                log::warn!(
                    "Rejected calibration {}: {:?}-axis ratio {}",
                    input.magnification_label,
                    axis,
                    value
                );
                return Err(CalibrationError::InvalidRatio { axis, value });
            }
        }
        let id = self.allocate_id();
        let profile = CalibrationProfile::from_input(id, input);
        self.profiles.insert(0, profile.clone());
        log::info!(
            "Added calibration #{} ({}, {:.4} {})",
            profile.id,
            profile.magnification_label,
            profile.x_axis_ratio,
            profile.unit
        );

        let evicted = match self.retention {
            RetentionPolicy::KeepMostRecent(n) if self.profiles.len() > n => {
                self.profiles.split_off(n)
            }
            _ => Vec::new(),
        };

        self.notify(&CalibrationEvent::Added(profile.clone()));
        for old in evicted {
            log::info!(
                "Evicted calibration #{} ({}) by retention policy",
                old.id,
                old.magnification_label
            );
            self.notify(&CalibrationEvent::Evicted(old));
        }
        Ok(profile)
    }

    /// Make `id` the single active profile, deactivating every other one
    pub fn activate(&mut self, id: CalibrationId) -> Result<CalibrationProfile> {
        if self.get(id).is_none() {
            log::warn!("Cannot activate calibration #{}: not found", id);
            return Err(CalibrationError::NotFound(id));
        }
        for profile in &mut self.profiles {
            profile.is_active = profile.id == id;
        }
        let active = self
            .get(id)
            .cloned()
            .ok_or(CalibrationError::NotFound(id))?;
        log::info!("Activated calibration #{} ({})", id, active.magnification_label);
        self.notify(&CalibrationEvent::Activated(active.clone()));
        Ok(active)
    }

    /// Delete a profile. Removing the active profile leaves nothing active.
    pub fn remove(&mut self, id: CalibrationId) -> Result<CalibrationProfile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| {
                log::warn!("Cannot remove calibration #{}: not found", id);
                CalibrationError::NotFound(id)
            })?;
        let profile = self.profiles.remove(index);
        let was_active = profile.is_active;
        log::info!(
            "Removed calibration #{} ({}){}",
            id,
            profile.magnification_label,
            if was_active { ", no calibration active" } else { "" }
        );
        self.notify(&CalibrationEvent::Removed {
            profile: profile.clone(),
            was_active,
        });
        Ok(profile)
    }

    // ── Observers ──

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&CalibrationEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: &CalibrationEvent) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn input(label: &str, ratio: f64) -> CalibrationInput {
        CalibrationInput {
            magnification_label: label.to_string(),
            x_axis_ratio: ratio,
            y_axis_ratio: ratio,
            unit: "µm/pixel".to_string(),
            created_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    fn active_count(store: &CalibrationStore) -> usize {
        store.list().iter().filter(|p| p.is_active).count()
    }

    #[test]
    fn test_add_assigns_unique_ids_and_inserts_front() {
        let mut store = CalibrationStore::with_retention(RetentionPolicy::Unbounded);
        let a = store.add(input("10X", 1.0)).unwrap();
        let b = store.add(input("20X", 0.5)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(!a.is_active && !b.is_active);
        assert_eq!(store.list()[0].id, b.id);
        assert_eq!(store.list()[1].id, a.id);
    }

    #[test]
    fn test_default_retention_keeps_two_most_recent() {
        let mut store = CalibrationStore::new();
        let first = store.add(input("10X", 1.0)).unwrap();
        let second = store.add(input("20X", 0.5)).unwrap();
        let third = store.add(input("40X", 0.25)).unwrap();

        assert_eq!(store.len(), 2);
        let ids: Vec<_> = store.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);
        assert!(store.get(first.id).is_none());
    }

    #[test]
    fn test_seeded_store_truncates_on_add() {
        let mut store = CalibrationStore::with_config(&CalibrationConfig::default());
        assert_eq!(store.len(), 2);
        let oldest = store.list()[1].id;
        store.add(input("500X", 0.1)).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(oldest).is_none());
    }

    #[test]
    fn test_at_most_one_active() {
        let mut store = CalibrationStore::with_retention(RetentionPolicy::Unbounded);
        let ids: Vec<_> = (0..5)
            .map(|i| store.add(input(&format!("{}X", i), 1.0)).unwrap().id)
            .collect();
        for &id in ids.iter().chain(ids.iter().rev()) {
            store.activate(id).unwrap();
            assert_eq!(active_count(&store), 1);
            assert_eq!(store.get_active().map(|p| p.id), Some(id));
        }
    }

    #[test]
    fn test_activate_unknown_id_is_not_found() {
        let mut store = CalibrationStore::new();
        let a = store.add(input("10X", 1.0)).unwrap();
        store.activate(a.id).unwrap();
        let err = store.activate(CalibrationId(999)).unwrap_err();
        assert!(matches!(err, CalibrationError::NotFound(CalibrationId(999))));
        assert_eq!(store.get_active().map(|p| p.id), Some(a.id));
    }

    #[test]
    fn test_remove_active_clears_active() {
        let mut store = CalibrationStore::new();
        let a = store.add(input("10X", 1.0)).unwrap();
        let b = store.add(input("20X", 0.5)).unwrap();
        store.activate(a.id).unwrap();

        let removed = store.remove(a.id).unwrap();
        assert!(removed.is_active);
        assert!(store.get_active().is_none());
        assert!(!store.is_active());
        assert!(!store.get(b.id).unwrap().is_active);
    }

    #[test]
    fn test_remove_unknown_id_is_not_found() {
        let mut store = CalibrationStore::new();
        assert!(matches!(
            store.remove(CalibrationId(42)),
            Err(CalibrationError::NotFound(_))
        ));
    }

    #[test]
    fn test_eviction_of_active_profile_clears_active() {
        let mut store = CalibrationStore::new();
        let a = store.add(input("10X", 1.0)).unwrap();
        store.add(input("20X", 0.5)).unwrap();
        store.activate(a.id).unwrap();
        store.add(input("40X", 0.25)).unwrap();
        assert!(store.get_active().is_none());
    }

    #[test]
    fn test_ratio_reads() {
        let mut store = CalibrationStore::new();
        assert_eq!(store.ratio(Axis::X), None);
        assert!(store.ratio_info().is_none());

        let p = store
            .add(CalibrationInput {
                x_axis_ratio: 0.5,
                y_axis_ratio: 0.75,
                ..input("100X", 0.5)
            })
            .unwrap();
        store.activate(p.id).unwrap();
        assert_eq!(store.ratio(Axis::X), Some(0.5));
        assert_eq!(store.ratio(Axis::Y), Some(0.75));
        let info = store.ratio_info().unwrap();
        assert_eq!(info.unit, "µm/pixel");
        assert_eq!(store.pixels_to_units(10.0, Axis::Y), Some(7.5));
    }

    #[test]
    fn test_observers_receive_events_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut store = CalibrationStore::new();
        let sub = store.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let a = store.add(input("10X", 1.0)).unwrap();
        store.add(input("20X", 0.5)).unwrap();
        store.activate(a.id).unwrap();
        store.add(input("40X", 0.25)).unwrap();

        {
            let got = events.borrow();
            assert_eq!(got.len(), 5);
            assert!(matches!(&got[0], CalibrationEvent::Added(p) if p.id == a.id));
            assert!(matches!(&got[2], CalibrationEvent::Activated(p) if p.id == a.id));
            assert!(matches!(&got[3], CalibrationEvent::Added(_)));
            assert!(matches!(&got[4], CalibrationEvent::Evicted(p) if p.id == a.id && p.is_active));
        }

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add(input("80X", 0.1)).unwrap();
        assert_eq!(events.borrow().len(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_or_non_finite_ratios() {
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let mut store = CalibrationStore::new();
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        for bad in [-2.0, 0.0, f64::NAN, f64::INFINITY] {
            let err = store.add(input("10X", bad)).unwrap_err();
            assert!(matches!(err, CalibrationError::InvalidRatio { axis: Axis::X, .. }));
        }
        let err = store
            .add(CalibrationInput {
                y_axis_ratio: f64::NAN,
                ..input("10X", 1.0)
            })
            .unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidRatio { axis: Axis::Y, .. }));

        assert!(store.is_empty());
        assert_eq!(*events.borrow(), 0);
    }

    #[test]
    fn test_zero_retention_keeps_the_new_profile() {
        let mut store = CalibrationStore::with_retention(RetentionPolicy::KeepMostRecent(0));
        assert_eq!(store.retention(), RetentionPolicy::KeepMostRecent(1));

        store.add(input("10X", 1.0)).unwrap();
        let latest = store.add(input("20X", 0.5)).unwrap();
        assert_eq!(store.len(), 1);
        store.activate(latest.id).unwrap();
        assert_eq!(store.ratio(Axis::X), Some(0.5));
    }

    #[test]
    fn test_failed_mutation_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut store = CalibrationStore::new();
        store.subscribe(move |_| *sink.borrow_mut() += 1);
        let _ = store.activate(CalibrationId(1));
        let _ = store.remove(CalibrationId(1));
        assert_eq!(*count.borrow(), 0);
    }
}
