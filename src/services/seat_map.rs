use serde::Serialize;
use std::collections::HashMap;

use crate::models::booking::join_seats;
use crate::models::{SeatCode, SeatLayout};
use crate::services::BookedSeatRegistry;

pub const BOOKED_HINT: &str = "Already booked";
pub const EMPTY_SELECTION_LABEL: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Available,
    Selected,
    Booked,
}

/// Одна кнопка места в схеме зала.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatControl {
    pub code: SeatCode,
    pub number: u16,
    pub state: SeatState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl SeatControl {
    pub fn is_clickable(&self) -> bool {
        self.state != SeatState::Booked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatRow {
    pub label: char,
    pub seats: Vec<SeatControl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatActivation {
    Selected,
    Deselected,
    /// Занятое или несуществующее место: ничего не меняется.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct ControlSlot {
    row: usize,
    seat: usize,
}

/// Состояние и модель отрисовки схемы зала.
///
/// Таблица диспетчеризации `SeatCode -> ControlSlot` строится один раз в `new`,
/// `rebuild` пересоздаёт только сами кнопки, поэтому обработка клика
/// не дублируется сколько бы раз схема ни перерисовывалась.
#[derive(Debug, Clone)]
pub struct SeatMap {
    layout: SeatLayout,
    dispatch: HashMap<SeatCode, ControlSlot>,
    rows: Vec<SeatRow>,
    selected: Vec<SeatCode>,
}

impl SeatMap {
    pub fn new(layout: SeatLayout) -> Self {
        let seats_per_row = layout.seats_per_row() as usize;
        let dispatch = layout
            .codes()
            .enumerate()
            .map(|(i, code)| {
                let slot = ControlSlot { row: i / seats_per_row, seat: i % seats_per_row };
                (code, slot)
            })
            .collect();

        Self {
            layout,
            dispatch,
            rows: Vec::new(),
            selected: Vec::new(),
        }
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    /// Пересобирает все кнопки из текущих множеств занятых и выбранных мест.
    pub fn rebuild(&mut self, booked: &BookedSeatRegistry) {
        // Занятое место не может оставаться выбранным
        self.selected.retain(|code| !booked.contains(code));

        self.rows.clear();
        for &label in self.layout.rows() {
            let seats = (1..=self.layout.seats_per_row())
                .map(|number| {
                    let code = SeatCode::new(label, number);
                    let state = if booked.contains(&code) {
                        SeatState::Booked
                    } else if self.selected.contains(&code) {
                        SeatState::Selected
                    } else {
                        SeatState::Available
                    };
                    SeatControl {
                        code,
                        number,
                        state,
                        hint: (state == SeatState::Booked).then_some(BOOKED_HINT),
                    }
                })
                .collect();
            self.rows.push(SeatRow { label, seats });
        }
    }

    /// Клик по месту: переключает выбор. Клик по занятому месту игнорируется.
    pub fn activate(&mut self, code: SeatCode, booked: &BookedSeatRegistry) -> SeatActivation {
        let Some(slot) = self.dispatch.get(&code).copied() else {
            return SeatActivation::Ignored;
        };
        if booked.contains(&code) {
            return SeatActivation::Ignored;
        }
        let Some(control) = self
            .rows
            .get_mut(slot.row)
            .and_then(|row| row.seats.get_mut(slot.seat))
        else {
            return SeatActivation::Ignored;
        };

        match control.state {
            SeatState::Booked => SeatActivation::Ignored,
            SeatState::Selected => {
                control.state = SeatState::Available;
                self.selected.retain(|c| *c != code);
                SeatActivation::Deselected
            }
            SeatState::Available => {
                control.state = SeatState::Selected;
                self.selected.push(code);
                SeatActivation::Selected
            }
        }
    }

    /// Выбранные места в порядке выбора.
    pub fn selection(&self) -> &[SeatCode] {
        &self.selected
    }

    pub fn selection_label(&self) -> String {
        if self.selected.is_empty() {
            EMPTY_SELECTION_LABEL.to_string()
        } else {
            join_seats(&self.selected)
        }
    }

    /// Значение скрытого поля формы; пустая строка, если ничего не выбрано.
    pub fn selection_field(&self) -> String {
        join_seats(&self.selected)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        for control in self.rows.iter_mut().flat_map(|row| row.seats.iter_mut()) {
            if control.state == SeatState::Selected {
                control.state = SeatState::Available;
            }
        }
    }

    pub fn rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn control(&self, code: &SeatCode) -> Option<&SeatControl> {
        let slot = self.dispatch.get(code)?;
        self.rows.get(slot.row)?.seats.get(slot.seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seat(raw: &str) -> SeatCode {
        raw.parse().unwrap()
    }

    fn rendered(booked: &[&str]) -> (SeatMap, BookedSeatRegistry) {
        let mut registry = BookedSeatRegistry::new();
        registry.merge(booked.iter().map(|s| seat(s)));
        let mut map = SeatMap::new(SeatLayout::default());
        map.rebuild(&registry);
        (map, registry)
    }

    #[test]
    fn initial_render_marks_booked_seats() {
        let (map, _) = rendered(&["A1", "A2"]);
        assert_eq!(map.rows().len(), 6);
        assert!(map.rows().iter().all(|row| row.seats.len() == 10));

        let a1 = map.control(&seat("A1")).unwrap();
        assert_eq!(a1.state, SeatState::Booked);
        assert_eq!(a1.hint, Some(BOOKED_HINT));
        assert!(!a1.is_clickable());

        let available = map
            .rows()
            .iter()
            .flat_map(|row| row.seats.iter())
            .filter(|c| c.state == SeatState::Available)
            .count();
        assert_eq!(available, 58);
    }

    #[test]
    fn toggling_tracks_insertion_order() {
        let (mut map, registry) = rendered(&[]);
        assert_eq!(map.selection_label(), "None");
        assert_eq!(map.selection_field(), "");

        assert_eq!(map.activate(seat("C5"), &registry), SeatActivation::Selected);
        assert_eq!(map.activate(seat("A2"), &registry), SeatActivation::Selected);
        assert_eq!(map.selection_label(), "C5, A2");
        assert_eq!(map.control(&seat("C5")).unwrap().state, SeatState::Selected);

        assert_eq!(map.activate(seat("C5"), &registry), SeatActivation::Deselected);
        assert_eq!(map.selection(), &[seat("A2")]);
        assert_eq!(map.control(&seat("C5")).unwrap().state, SeatState::Available);
    }

    #[test]
    fn booked_and_unknown_seats_are_ignored() {
        let (mut map, registry) = rendered(&["A1"]);
        assert_eq!(map.activate(seat("A1"), &registry), SeatActivation::Ignored);
        assert_eq!(map.activate(seat("G1"), &registry), SeatActivation::Ignored);
        assert!(map.selection().is_empty());
    }

    #[test]
    fn rebuild_does_not_duplicate_click_handling() {
        let (mut map, registry) = rendered(&[]);
        for _ in 0..3 {
            map.rebuild(&registry);
        }
        // Один клик - одно переключение
        assert_eq!(map.activate(seat("B2"), &registry), SeatActivation::Selected);
        assert_eq!(map.selection(), &[seat("B2")]);
        assert_eq!(map.control(&seat("B2")).unwrap().state, SeatState::Selected);
    }

    #[test]
    fn rebuild_keeps_selection_and_promotes_booked() {
        let (mut map, mut registry) = rendered(&[]);
        map.activate(seat("B3"), &registry);
        map.activate(seat("B4"), &registry);

        map.rebuild(&registry);
        assert_eq!(map.control(&seat("B3")).unwrap().state, SeatState::Selected);

        registry.merge([seat("B3")]);
        map.rebuild(&registry);
        assert_eq!(map.control(&seat("B3")).unwrap().state, SeatState::Booked);
        assert_eq!(map.selection(), &[seat("B4")]);
    }

    #[test]
    fn activation_before_render_is_ignored() {
        let mut map = SeatMap::new(SeatLayout::default());
        let registry = BookedSeatRegistry::new();
        assert_eq!(map.activate(seat("A1"), &registry), SeatActivation::Ignored);
    }

    #[test]
    fn clear_selection_resets_controls() {
        let (mut map, registry) = rendered(&[]);
        map.activate(seat("D1"), &registry);
        map.clear_selection();
        assert!(map.selection().is_empty());
        assert_eq!(map.control(&seat("D1")).unwrap().state, SeatState::Available);
    }

    fn any_seat() -> impl Strategy<Value = SeatCode> {
        (0usize..6, 1u16..=10).prop_map(|(row, n)| SeatCode::new(['A', 'B', 'C', 'D', 'E', 'F'][row], n))
    }

    proptest! {
        #[test]
        fn selection_never_overlaps_booked(
            booked in proptest::collection::vec(any_seat(), 0..20),
            clicks in proptest::collection::vec(any_seat(), 0..60),
        ) {
            let mut registry = BookedSeatRegistry::new();
            registry.merge(booked);
            let mut map = SeatMap::new(SeatLayout::default());
            map.rebuild(&registry);

            for code in clicks {
                map.activate(code, &registry);
                prop_assert!(map.selection().iter().all(|c| !registry.contains(c)));
            }
        }

        #[test]
        fn double_toggle_restores_selection(
            clicks in proptest::collection::vec(any_seat(), 0..30),
            target in any_seat(),
        ) {
            let (mut map, registry) = rendered(&[]);
            for code in clicks {
                map.activate(code, &registry);
            }
            let mut before = map.selection().to_vec();
            map.activate(target, &registry);
            map.activate(target, &registry);
            let mut after = map.selection().to_vec();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }
    }
}
