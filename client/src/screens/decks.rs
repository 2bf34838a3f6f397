use shared::protocol::Deck;

pub const DECKS_LEGEND: &str = "Select which decks you would like to play with";
pub const DECKS_HELPER: &str = "You must select at least one";

// Decks with this in their name start out selected
const DEFAULT_DECK_MARKER: &str = "Base";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOption {
    pub deck: Deck,
    pub selected: bool,
}

/// Deck checklist of the create-room form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSelection {
    options: Vec<DeckOption>,
}

impl DeckSelection {
    pub fn new(decks: &[Deck]) -> Self {
        let options = decks
            .iter()
            .map(|deck| DeckOption {
                selected: deck.name.contains(DEFAULT_DECK_MARKER),
                deck: deck.clone(),
            })
            .collect();
        Self { options }
    }

    /// Nothing to pick from when the server offered no decks.
    pub fn is_visible(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn options(&self) -> &[DeckOption] {
        &self.options
    }

    /// Returns false when no deck has that id.
    pub fn toggle(&mut self, deck_id: &str, selected: bool) -> bool {
        match self.options.iter_mut().find(|o| o.deck.id == deck_id) {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.deck.id.clone())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.options.iter().any(|o| o.selected)
    }
}
