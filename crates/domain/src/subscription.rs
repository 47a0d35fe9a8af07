//! Subscription table: correlates command ids with the devices they watch.
//!
//! Built once at startup and never mutated afterwards.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::id::{CommandId, DeviceId};

/// Immutable mapping from [`CommandId`] to [`DeviceId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionTable {
    entries: BTreeMap<CommandId, DeviceId>,
}

impl SubscriptionTable {
    /// Assign command ids `0, 1, 2, …` to `devices` in order.
    #[must_use]
    pub fn from_devices(devices: impl IntoIterator<Item = DeviceId>) -> Self {
        let entries = (0..)
            .map(CommandId::new)
            .zip(devices)
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn builder() -> SubscriptionTableBuilder {
        SubscriptionTableBuilder::default()
    }

    /// Look up the device a frame's command id refers to.
    #[must_use]
    pub fn resolve(&self, cmd_id: CommandId) -> Option<&DeviceId> {
        self.entries.get(&cmd_id)
    }

    /// Find the command id registered for `device`.
    #[must_use]
    pub fn command_id_of(&self, device: &DeviceId) -> Option<CommandId> {
        self.entries
            .iter()
            .find_map(|(cmd_id, dev)| (dev == device).then_some(*cmd_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &DeviceId)> {
        self.entries.iter().map(|(cmd_id, dev)| (*cmd_id, dev))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Step-by-step builder for [`SubscriptionTable`] with explicit ids.
#[derive(Debug, Default)]
pub struct SubscriptionTableBuilder {
    entries: BTreeMap<CommandId, DeviceId>,
}

impl SubscriptionTableBuilder {
    /// Register `device` under `cmd_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCommandId`] if `cmd_id` is taken.
    pub fn insert(mut self, cmd_id: CommandId, device: DeviceId) -> Result<Self, ValidationError> {
        if self.entries.contains_key(&cmd_id) {
            return Err(ValidationError::DuplicateCommandId(cmd_id.get()));
        }
        self.entries.insert(cmd_id, device);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> SubscriptionTable {
        SubscriptionTable {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(raw: &str) -> DeviceId {
        DeviceId::new(raw).unwrap()
    }

    #[test]
    fn should_number_devices_from_zero() {
        let table = SubscriptionTable::from_devices([device("sensor"), device("lights")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(CommandId::new(0)), Some(&device("sensor")));
        assert_eq!(table.resolve(CommandId::new(1)), Some(&device("lights")));
    }

    #[test]
    fn should_not_resolve_unknown_command_id() {
        let table = SubscriptionTable::from_devices([device("sensor")]);
        assert_eq!(table.resolve(CommandId::new(7)), None);
    }

    #[test]
    fn should_find_command_id_by_device() {
        let table = SubscriptionTable::from_devices([device("sensor"), device("lights")]);
        assert_eq!(table.command_id_of(&device("lights")), Some(CommandId::new(1)));
        assert_eq!(table.command_id_of(&device("other")), None);
    }

    #[test]
    fn should_reject_duplicate_command_id_in_builder() {
        let result = SubscriptionTable::builder()
            .insert(CommandId::new(3), device("a"))
            .unwrap()
            .insert(CommandId::new(3), device("b"));
        assert_eq!(result.unwrap_err(), ValidationError::DuplicateCommandId(3));
    }

    #[test]
    fn should_iterate_in_command_id_order() {
        let table = SubscriptionTable::builder()
            .insert(CommandId::new(5), device("b"))
            .unwrap()
            .insert(CommandId::new(2), device("a"))
            .unwrap()
            .build();
        let ids: Vec<_> = table.iter().map(|(cmd_id, _)| cmd_id.get()).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn should_start_empty() {
        assert!(SubscriptionTable::default().is_empty());
    }
}
