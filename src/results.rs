use crate::card::OnuCard;
use crate::models::{DeviceRecord, OnuKey, QueryOutcome};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Contents of the results overlay.
#[derive(Debug, Default)]
pub struct ResultsView {
    pub cards: Vec<OnuCard>,
    pub overlay_open: bool,
    /// Index of the chosen card. Selection is positional so two records that
    /// share a key still map to distinct cards.
    pub selected: Option<usize>,
}

impl ResultsView {
    pub fn selected_key(&self) -> Option<OnuKey> {
        self.selected
            .and_then(|idx| self.cards.get(idx))
            .map(|card| card.key.clone())
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.cards.len() {
            self.selected = Some(idx);
        }
    }

    /// Replaces the cards with one per record and opens the overlay.
    fn render(&mut self, records: &[DeviceRecord]) {
        self.cards = records.iter().map(OnuCard::from_record).collect();
        self.overlay_open = true;

        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(&card.key) {
                warn!("Duplicate ONU key {} in one result set", card.key);
            }
        }
    }

    fn clear(&mut self) {
        self.cards.clear();
        self.selected = None;
        self.overlay_open = false;
    }
}

/// Outcome of applying a status response to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(usize),
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct ResultList {
    view: Arc<Mutex<ResultsView>>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, ResultsView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the previous contents, then renders the records. An empty
    /// outcome leaves the overlay closed.
    pub fn apply(&self, outcome: &QueryOutcome) -> RenderOutcome {
        let mut view = self.lock();
        view.clear();
        match outcome {
            QueryOutcome::Records(records) if !records.is_empty() => {
                view.render(records);
                RenderOutcome::Rendered(view.cards.len())
            }
            _ => RenderOutcome::Empty,
        }
    }

    /// Hides the overlay and keeps the cards for the next open.
    pub fn close_overlay(&self) {
        self.lock().overlay_open = false;
    }

    pub fn selected_key(&self) -> Option<OnuKey> {
        self.lock().selected_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(olt_ip: &str, fsp: &str, ont_id: &str) -> DeviceRecord {
        DeviceRecord {
            description: format!("{} {}", fsp, ont_id),
            olt_ip: olt_ip.into(),
            fsp: fsp.into(),
            ont_id: ont_id.into(),
            run_state: Some("online".into()),
            rx_power: None,
            alarm: None,
            sn: None,
        }
    }

    #[test]
    fn renders_one_card_per_record_and_opens() {
        let list = ResultList::new();
        let outcome = QueryOutcome::Records(vec![
            record("10.0.0.1", "0/1/2", "3"),
            record("10.0.0.1", "0/1/2", "4"),
        ]);

        assert_eq!(list.apply(&outcome), RenderOutcome::Rendered(2));
        let view = list.lock();
        assert!(view.overlay_open);
        assert_eq!(view.cards.len(), 2);
    }

    #[test]
    fn new_results_replace_previous_ones() {
        let list = ResultList::new();
        list.apply(&QueryOutcome::Records(vec![
            record("10.0.0.1", "0/1/2", "3"),
            record("10.0.0.1", "0/1/2", "4"),
        ]));
        list.lock().select(1);

        list.apply(&QueryOutcome::Records(vec![record("10.0.0.2", "0/2/1", "7")]));
        let view = list.lock();
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].key.olt_ip, "10.0.0.2");
        assert_eq!(view.selected, None);
    }

    #[test]
    fn empty_outcomes_keep_overlay_closed() {
        let list = ResultList::new();
        assert_eq!(list.apply(&QueryOutcome::Empty), RenderOutcome::Empty);
        assert_eq!(list.apply(&QueryOutcome::Records(vec![])), RenderOutcome::Empty);
        assert!(!list.lock().overlay_open);
    }

    #[test]
    fn close_keeps_cards() {
        let list = ResultList::new();
        list.apply(&QueryOutcome::Records(vec![record("10.0.0.1", "0/1/2", "3")]));
        list.close_overlay();

        let view = list.lock();
        assert!(!view.overlay_open);
        assert_eq!(view.cards.len(), 1);
    }

    #[test]
    fn duplicate_keys_remain_separately_selectable() {
        let list = ResultList::new();
        list.apply(&QueryOutcome::Records(vec![
            record("10.0.0.1", "0/1/2", "3"),
            record("10.0.0.1", "0/1/2", "3"),
        ]));

        let mut view = list.lock();
        view.select(1);
        assert_eq!(view.selected, Some(1));
        view.select(5);
        assert_eq!(view.selected, Some(1));
        assert_eq!(view.selected_key().map(|k| k.ont_id), Some("3".to_string()));
    }
}
