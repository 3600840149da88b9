use crate::catalog::{self, OrderSummary, SeatId};
use crate::seating::board::{SeatBoard, SeatStatus};
use crate::AppState;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Живая страница выбора мест для одного события.
///
/// Держит `SeatBoard` под мьютексом и четыре фоновые задачи:
/// опрос бэкенда (5с), имитацию конкуренции (4с), очистку истёкших
/// удержаний (1с) и подписку на обновления кеша от соседних сессий.
/// Смена события - это drop текущей сессии и запуск новой: вместе с
/// сессией сбрасывается и накопленный список продаж.
pub struct SeatSession {
    event_id: i64,
    board: Arc<Mutex<SeatBoard>>,
    state: Arc<AppState>,
    tasks: Vec<JoinHandle<()>>,
}

impl SeatSession {
    pub fn start(state: Arc<AppState>, event_id: i64) -> Self {
        let board = Arc::new(Mutex::new(SeatBoard::new(
            event_id,
            state.config.seating.hold_timeout(),
        )));
        let mut tasks = Vec::new();

        // Опрос бэкенда + локального кеша. Первый тик interval срабатывает
        // сразу, так что начальная загрузка - это он же.
        {
            let board = board.clone();
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(state.config.seating.poll_interval());
                loop {
                    tick.tick().await;
                    let remote = state.api.booked_seats(event_id).await;
                    let cached = state.cache.read(event_id);
                    let added = {
                        let mut board = board.lock().unwrap();
                        board.merge_booked(remote.into_iter().chain(cached))
                    };
                    if added > 0 {
                        info!("event {}: {} newly sold seats", event_id, added);
                    } else {
                        debug!("event {}: poll tick, nothing new", event_id);
                    }
                }
            }));
        }

        // Имитация конкуренции за места
        if state.config.features.enable_contention_sim {
            let board = board.clone();
            let interval = state.config.seating.contention_interval();
            tasks.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(interval);
                loop {
                    tick.tick().await;
                    let mut rng = rand::rng();
                    board.lock().unwrap().contention_tick(&mut rng);
                }
            }));
        }

        // Очистка истёкших удержаний
        {
            let board = board.clone();
            let interval = state.config.seating.sweep_interval();
            tasks.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(interval);
                loop {
                    tick.tick().await;
                    let expired = board.lock().unwrap().sweep_expired(Instant::now());
                    if !expired.is_empty() {
                        info!("released {} expired seat holds", expired.len());
                    }
                }
            }));
        }

        // Обновления кеша из соседних сессий ("других вкладок")
        {
            let board = board.clone();
            let mut rx = state.cache.subscribe();
            tasks.push(tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(update) if update.event_id == event_id => {
                            let added = board
                                .lock()
                                .unwrap()
                                .merge_booked(update.seats.into_iter());
                            if added > 0 {
                                debug!("merged {} sold seats from sibling session", added);
                            }
                        }
                        Ok(_) => {} // другое событие
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            // пропущенные уведомления не страшны: append шлёт
                            // полный список, очередной догонит
                            warn!("cache updates lagged by {}", n);
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }));
        }

        SeatSession {
            event_id,
            board,
            state,
            tasks,
        }
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn status(&self, seat: SeatId) -> SeatStatus {
        self.board.lock().unwrap().status(seat)
    }

    /// Клик по месту. No-op для проданных и занятых мест.
    pub fn toggle(&self, seat: SeatId) -> SeatStatus {
        self.board.lock().unwrap().toggle(seat, Instant::now())
    }

    pub fn selected(&self) -> Vec<SeatId> {
        self.board.lock().unwrap().selected()
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::for_seats(&self.selected())
    }

    pub fn booked_count(&self) -> usize {
        self.board.lock().unwrap().booked_count()
    }

    /// Снимок всего зала в порядке ряд-за-рядом, для отрисовки.
    pub fn snapshot(&self) -> Vec<(SeatId, SeatStatus)> {
        let board = self.board.lock().unwrap();
        catalog::grid().map(|seat| (seat, board.status(seat))).collect()
    }

    /// Уведомление "места проданы" из чекаута той же сессии: сразу в
    /// board, затем в кеш - его broadcast разбудит соседние сессии, не
    /// дожидаясь их poll-тика.
    pub fn seats_sold(&self, seats: &[SeatId]) {
        self.board.lock().unwrap().mark_purchased(seats);
        self.state.cache.append(self.event_id, seats);
    }
}

impl Drop for SeatSession {
    // Все таймеры и подписки снимаются на любом пути выхода
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
