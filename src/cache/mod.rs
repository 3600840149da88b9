use crate::catalog::SeatId;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Уведомление для соседних сессий: список проданных мест события обновился.
/// Несёт полный объединённый список, а не дельту.
#[derive(Debug, Clone)]
pub struct CacheUpdate {
    pub event_id: i64,
    pub seats: Vec<SeatId>,
}

/// Локальный кеш проданных мест, по файлу на событие.
///
/// Аналог localStorage-ключа `bookedSeats_{eventId}` из веб-клиента: скрывает
/// задержку между оформлением покупки и появлением мест в ответе бэкенда.
/// Кеш никогда не авторитетнее бэкенда - потребители только объединяют его
/// содержимое с удалённым списком, вычитания не бывает.
#[derive(Clone)]
pub struct SoldSeatCache {
    dir: PathBuf,
    tx: broadcast::Sender<CacheUpdate>,
}

impl SoldSeatCache {
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let (tx, _) = broadcast::channel(64);
        Ok(SoldSeatCache { dir, tx })
    }

    fn path(&self, event_id: i64) -> PathBuf {
        self.dir.join(format!("sold_{}.json", event_id))
    }

    /// Список проданных мест события. Отсутствующий или битый файл
    /// читается как пустой список - в сторону доступности, не блокировки.
    pub fn read(&self, event_id: i64) -> Vec<SeatId> {
        let path = self.path(event_id);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(_) => return vec![],
        };
        match serde_json::from_str::<Vec<SeatId>>(&data) {
            Ok(seats) => seats,
            Err(e) => {
                warn!("corrupt sold-seat cache {:?}, treating as empty: {}", path, e);
                vec![]
            }
        }
    }

    /// Read-modify-write с union-семантикой: повторное добавление уже
    /// известного места ничего не меняет. Возвращает объединённый список
    /// и рассылает его подписчикам (соседним "вкладкам").
    pub fn append(&self, event_id: i64, seats: &[SeatId]) -> Vec<SeatId> {
        let mut merged: BTreeSet<SeatId> = self.read(event_id).into_iter().collect();
        merged.extend(seats.iter().copied());
        let merged: Vec<SeatId> = merged.into_iter().collect();

        match serde_json::to_string(&merged) {
            Ok(data) => {
                if let Err(e) = std::fs::write(self.path(event_id), data) {
                    warn!("failed to persist sold-seat cache for event {}: {}", event_id, e);
                } else {
                    info!(
                        "sold-seat cache for event {} now holds {} seats",
                        event_id,
                        merged.len()
                    );
                }
            }
            Err(e) => warn!("failed to serialize sold-seat cache: {}", e),
        }

        // Ошибка здесь означает лишь отсутствие подписчиков
        let _ = self.tx.send(CacheUpdate {
            event_id,
            seats: merged.clone(),
        });
        merged
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheUpdate> {
        self.tx.subscribe()
    }
}
