//! # Mapping Store
//!
//! Table from virtual channel to calibration record. At most one record
//! exists per [`XInputType`]; iteration follows the channel declaration order.

use std::collections::BTreeMap;

use super::calibration::CalibrationRecord;
use super::xinput::XInputType;

/// Calibration records keyed by virtual channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingStore<P> {
    records: BTreeMap<XInputType, CalibrationRecord<P>>,
}

impl<P> Default for MappingStore<P> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<P: Copy> MappingStore<P> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` for `input`, replacing any previous one.
    pub fn insert(&mut self, input: XInputType, record: CalibrationRecord<P>) {
        self.records.insert(input, record);
    }

    /// Returns the record for `input` without modifying the store.
    #[must_use]
    pub fn get(&self, input: XInputType) -> Option<&CalibrationRecord<P>> {
        self.records.get(&input)
    }

    /// Returns the record for `input`, first storing the disabled default
    /// when none exists.
    pub fn get_or_insert_default(&mut self, input: XInputType) -> &mut CalibrationRecord<P> {
        self.records
            .entry(input)
            .or_insert_with(|| CalibrationRecord::disabled(input))
    }

    /// Removes and returns the record for `input`.
    pub fn remove(&mut self, input: XInputType) -> Option<CalibrationRecord<P>> {
        self.records.remove(&input)
    }

    /// Returns true when `input` has a record.
    #[must_use]
    pub fn contains(&self, input: XInputType) -> bool {
        self.records.contains_key(&input)
    }

    /// Iterates records in channel declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (XInputType, &CalibrationRecord<P>)> {
        self.records.iter().map(|(input, record)| (*input, record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Store = MappingStore<u8>;

    #[test]
    fn test_new_store_is_empty() {
        let store = Store::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(XInputType::A).is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut store = Store::new();
        store.insert(XInputType::A, CalibrationRecord::new(1, 0.0, 1.0, 0.0));
        store.insert(XInputType::A, CalibrationRecord::new(2, 0.0, 1.0, 0.0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(XInputType::A).unwrap().source, Some(2));
    }

    #[test]
    fn test_get_does_not_insert() {
        let store = Store::new();
        let _ = store.get(XInputType::LX);
        assert!(!store.contains(XInputType::LX));
    }

    #[test]
    fn test_get_or_insert_default_creates_disabled_record() {
        let mut store = Store::new();
        let record = *store.get_or_insert_default(XInputType::RX);

        assert_eq!(record, CalibrationRecord::disabled(XInputType::RX));
        assert!(store.contains(XInputType::RX));
    }

    #[test]
    fn test_get_or_insert_default_keeps_existing() {
        let mut store = Store::new();
        store.insert(XInputType::B, CalibrationRecord::new(7, 0.1, 0.9, 0.2));

        let record = store.get_or_insert_default(XInputType::B);
        assert_eq!(record.source, Some(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_insert_default_returns_mutable_record() {
        let mut store = Store::new();
        store.get_or_insert_default(XInputType::L2).deadzone = 0.3;
        assert_eq!(store.get(XInputType::L2).unwrap().deadzone, 0.3);
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let mut store = Store::new();
        store.insert(XInputType::R2, CalibrationRecord::new(1, 0.0, 1.0, 0.0));
        store.insert(XInputType::A, CalibrationRecord::new(2, 0.0, 1.0, 0.0));
        store.insert(XInputType::LX, CalibrationRecord::new(3, 0.0, 1.0, 0.0));

        let order: Vec<_> = store.iter().map(|(input, _)| input).collect();
        assert_eq!(order, vec![XInputType::A, XInputType::LX, XInputType::R2]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = Store::new();
        store.insert(XInputType::A, CalibrationRecord::new(1, 0.0, 1.0, 0.0));
        store.insert(XInputType::B, CalibrationRecord::new(2, 0.0, 1.0, 0.0));

        assert!(store.remove(XInputType::A).is_some());
        assert!(store.remove(XInputType::A).is_none());
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
