//! board.rs
//!
//! Этот модуль реализует сведение статусов мест на странице бронирования.
//!
//! Ключевые компоненты:
//! 1.  **SeatBoard**: состояние зала для одного события. Объединяет три
//!     независимых источника: подтверждённые бэкендом продажи, имитацию
//!     блокировок других покупателей и собственные временные удержания
//!     пользователя с TTL 15 минут.
//! 2.  **Приоритет статусов**: продано > занято другим > выбрано >
//!     собственная блокировка > свободно. Статус не хранится, а вычисляется
//!     заново при каждом обращении.
//! 3.  **Таймеры**: фоновые тики (опрос бэкенда, имитация конкуренции,
//!     очистка истёкших удержаний) живут в `session.rs`; здесь - только
//!     синхронные переходы состояния, чтобы каждый из них покрывался
//!     юнит-тестом.

use crate::catalog::{self, SeatId};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

/// Метка, которую несёт имитированная блокировка.
pub const CONTENTION_LABEL: &str = "another user";

/// Статус места, вычисляемый из снимков источников.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    /// Продано. Терминальный статус, место не интерактивно.
    Booked,
    /// Занято другим покупателем (имитация), не интерактивно.
    LockedByOther,
    /// Выбрано текущим пользователем, можно снять выбор.
    Selected,
    /// Собственная блокировка. В текущей модели выбор и удержание - одна
    /// запись в карте резервов, так что статус не возникает отдельно от
    /// `Selected`; вариант оставлен для симметрии со статусами зала.
    LockedBySelf,
    /// Свободно, можно выбрать.
    Available,
}

impl SeatStatus {
    /// Может ли пользователь кликнуть по месту.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            SeatStatus::Selected | SeatStatus::LockedBySelf | SeatStatus::Available
        )
    }
}

/// Состояние зала одного события.
///
/// Продажи только накапливаются (union); сброс происходит созданием нового
/// `SeatBoard` при смене события.
#[derive(Debug)]
pub struct SeatBoard {
    event_id: i64,
    booked: BTreeSet<SeatId>,
    contention: HashMap<SeatId, &'static str>,
    reservations: HashMap<SeatId, Instant>,
    hold_timeout: Duration,
}

impl SeatBoard {
    pub fn new(event_id: i64, hold_timeout: Duration) -> Self {
        SeatBoard {
            event_id,
            booked: BTreeSet::new(),
            contention: HashMap::new(),
            reservations: HashMap::new(),
            hold_timeout,
        }
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    /// Сводный статус места, в строгом порядке приоритета.
    pub fn status(&self, seat: SeatId) -> SeatStatus {
        if self.booked.contains(&seat) {
            return SeatStatus::Booked;
        }
        if self.contention.contains_key(&seat) {
            return SeatStatus::LockedByOther;
        }
        if self.reservations.contains_key(&seat) {
            return SeatStatus::Selected;
        }
        SeatStatus::Available
    }

    /// Единственная мутация, доступная из UI: клик по месту.
    /// Для проданного или занятого места - no-op.
    pub fn toggle(&mut self, seat: SeatId, now: Instant) -> SeatStatus {
        match self.status(seat) {
            SeatStatus::Booked | SeatStatus::LockedByOther => {}
            SeatStatus::Selected | SeatStatus::LockedBySelf => self.deselect(seat),
            SeatStatus::Available => self.select(seat, now),
        }
        self.status(seat)
    }

    /// Удержание места с отметкой времени. Тихий no-op, если место
    /// продано или занято другим.
    pub fn select(&mut self, seat: SeatId, now: Instant) {
        if self.booked.contains(&seat) || self.contention.contains_key(&seat) {
            return;
        }
        self.reservations.insert(seat, now);
    }

    pub fn deselect(&mut self, seat: SeatId) {
        self.reservations.remove(&seat);
    }

    /// Объединяет свежий список продаж (бэкенд или кеш) с известным.
    /// Только добавление; продажа снимает резерв и имитацию конкуренции,
    /// переход одностороннний. Возвращает число новых продаж.
    pub fn merge_booked<I>(&mut self, seats: I) -> usize
    where
        I: IntoIterator<Item = SeatId>,
    {
        let mut added = 0;
        for seat in seats {
            if self.booked.insert(seat) {
                self.reservations.remove(&seat);
                self.contention.remove(&seat);
                added += 1;
            }
        }
        added
    }

    /// Убирает удержания старше таймаута. Возвращает истёкшие места.
    pub fn sweep_expired(&mut self, now: Instant) -> Vec<SeatId> {
        let timeout = self.hold_timeout;
        let expired: Vec<SeatId> = self
            .reservations
            .iter()
            .filter(|(_, &held_at)| now.saturating_duration_since(held_at) > timeout)
            .map(|(&seat, _)| seat)
            .collect();
        for seat in &expired {
            self.reservations.remove(seat);
        }
        expired
    }

    /// Один тик имитации конкуренции: случайное место зала, 50/50
    /// поставить или снять флаг. Проданные и удерживаемые места не трогаем.
    pub fn contention_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let row = catalog::ROWS[rng.random_range(0..catalog::ROWS.len())];
        let col = rng.random_range(1..=catalog::COLS_PER_ROW);
        let Ok(seat) = SeatId::new(row, col) else {
            return;
        };
        if self.booked.contains(&seat) || self.reservations.contains_key(&seat) {
            return;
        }
        if rng.random_bool(0.5) {
            self.contention.insert(seat, CONTENTION_LABEL);
        } else {
            self.contention.remove(&seat);
        }
    }

    /// Завершение покупки: выбранные места становятся проданными.
    pub fn mark_purchased(&mut self, seats: &[SeatId]) {
        for &seat in seats {
            self.reservations.remove(&seat);
            self.booked.insert(seat);
        }
    }

    /// Текущий выбор пользователя, отсортированный по месту.
    pub fn selected(&self) -> Vec<SeatId> {
        let mut seats: Vec<SeatId> = self.reservations.keys().copied().collect();
        seats.sort();
        seats
    }

    /// Сумма по выбранным местам, без сборов. O(n) от размера выбора.
    pub fn subtotal(&self) -> f64 {
        self.reservations.keys().map(|seat| seat.price()).sum()
    }

    pub fn booked_count(&self) -> usize {
        self.booked.len()
    }

    pub fn contended_label(&self, seat: SeatId) -> Option<&'static str> {
        self.contention.get(&seat).copied()
    }
}
