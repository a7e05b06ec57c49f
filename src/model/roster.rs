pub const MIN_PLAYERS: usize = 1;
pub const MAX_PLAYERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSlot {
    pub name: String,
    /// Student number or similar; optional.
    pub identifier: String,
}

/// Registered players at the kiosk and which one is about to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<PlayerSlot>,
    selected: Option<usize>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            slots: vec![PlayerSlot::default(); MIN_PLAYERS],
            selected: None,
        }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(&self) -> usize {
        self.slots.len()
    }

    /// Clamped to `MIN_PLAYERS..=MAX_PLAYERS`. Shrinking drops the trailing slots
    /// and the selection if it pointed at one of them.
    pub fn set_player_count(&mut self, count: usize) {
        let count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.slots.resize_with(count, PlayerSlot::default);
        if self.selected.is_some_and(|i| i >= count) {
            self.selected = None;
        }
    }

    /// `index` is zero-based. Returns false when out of range.
    pub fn set_player(&mut self, index: usize, name: &str, identifier: &str) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        slot.name = name.trim().to_string();
        slot.identifier = identifier.trim().to_string();
        if self.selected == Some(index) && slot.name.is_empty() {
            self.selected = None;
        }
        true
    }

    /// Selects the last slot registered under `name`, so a re-entered name
    /// takes over the earlier slot. Blank or unknown names clear the selection.
    pub fn select(&mut self, name: &str) -> bool {
        let name = name.trim();
        self.selected = if name.is_empty() {
            None
        } else {
            self.slots.iter().rposition(|slot| slot.name == name)
        };
        self.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&PlayerSlot> {
        self.selected.and_then(|i| self.slots.get(i))
    }

    /// Names offered for selection, skipping empty slots.
    pub fn names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|slot| slot.name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }
}
