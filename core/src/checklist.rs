use crate::prelude::{FireError, FireResult};
use crate::storage::Storage;
use log::info;
use std::collections::BTreeSet;

/// Emergency evacuation checklist, in display order.
pub const CHECKLIST_ITEMS: [&str; 17] = [
    "Have at least 1/2 tank of gas",
    "1 gallon water per person per day",
    "Non Perishable food",
    "Non electric can opener",
    "Insurance Card",
    "Identification",
    "Passports",
    "Deed to property",
    "Prescription Medication",
    "Flashlight",
    "Battery powered Radio with extra batteries",
    "Cash",
    "Extra set of keys (car, house)",
    "Glasses, including extra sets",
    "Family members, animals",
    "Computers",
    "Photos",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub item: &'static str,
    pub checked: bool,
}

/// Checklist whose checked items persist across runs.
pub struct Checklist<'a> {
    storage: &'a Storage,
    checked: BTreeSet<String>,
}

impl<'a> Checklist<'a> {
    /// Loads the checked set, dropping entries that are no longer items.
    pub fn load(storage: &'a Storage) -> FireResult<Self> {
        let checked = storage
            .checked_items()?
            .into_iter()
            .filter(|item| CHECKLIST_ITEMS.contains(&item.as_str()))
            .collect();
        Ok(Self { storage, checked })
    }

    pub fn entries(&self) -> Vec<ChecklistEntry> {
        CHECKLIST_ITEMS
            .iter()
            .map(|&item| ChecklistEntry {
                item,
                checked: self.checked.contains(item),
            })
            .collect()
    }

    pub fn is_checked(&self, item: &str) -> bool {
        self.checked.contains(item)
    }

    /// Flips one item and persists the result. Returns the new state.
    pub fn toggle(&mut self, item: &str) -> FireResult<bool> {
        if !CHECKLIST_ITEMS.contains(&item) {
            return Err(FireError::field(
                "item",
                format!("{item:?} is not on the checklist"),
            ));
        }
        let now_checked = if self.checked.remove(item) {
            false
        } else {
            self.checked.insert(item.to_string());
            true
        };
        self.storage.set_checked_items(&self.checked)?;
        info!("checklist item {:?} checked={}", item, now_checked);
        Ok(now_checked)
    }

    /// Toggles the item at a 1-based position in display order.
    pub fn toggle_position(&mut self, position: usize) -> FireResult<bool> {
        let item = position
            .checked_sub(1)
            .and_then(|index| CHECKLIST_ITEMS.get(index))
            .ok_or_else(|| {
                FireError::field(
                    "item",
                    format!("choose an item between 1 and {}", CHECKLIST_ITEMS.len()),
                )
            })?;
        self.toggle(item)
    }

    pub fn reset(&mut self) -> FireResult<()> {
        self.checked.clear();
        self.storage.set_checked_items(&self.checked)
    }
}
