use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_client::{
    catalog::SeatId,
    config::Config,
    seating::{SeatSession, SeatStatus},
    AppState,
};

// Демо страницы выбора мест: живой зал в терминале.
// Опрос бэкенда, имитация конкуренции и очистка удержаний крутятся в фоне,
// сценарий выбирает пару мест и дальше просто перерисовывает сетку.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ticket client demo");

    let state =
        AppState::new(config).map_err(|e| anyhow::anyhow!("failed to initialize state: {e}"))?;

    // Событие: первое из афиши, либо дефолтное, если бэкенд недоступен
    let event_id = match state.api.events().await {
        Ok(events) if !events.is_empty() => {
            info!("Loaded {} events, using '{}'", events.len(), events[0].title);
            events[0].id
        }
        Ok(_) => {
            warn!("backend returned no events, falling back to event 1");
            1
        }
        Err(e) => {
            warn!("failed to load events ({}), falling back to event 1", e);
            1
        }
    };

    let session = SeatSession::start(state.clone(), event_id);

    // Первому опросу нужно мгновение
    tokio::time::sleep(Duration::from_millis(500)).await;

    // Сценарий: VIP у сцены и место на балконе
    for id in ["A1", "I1"] {
        let seat: SeatId = id.parse()?;
        session.toggle(seat);
    }

    println!("legend: . available  * selected  ! locked by others  x sold");

    loop {
        render(&session);
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

fn render(session: &SeatSession) {
    println!();
    println!("                 STAGE");
    let mut current_row = ' ';
    for (seat, status) in session.snapshot() {
        if seat.row() != current_row {
            if current_row != ' ' {
                println!();
            }
            current_row = seat.row();
            print!("{}  ", current_row);
        }
        let glyph = match status {
            SeatStatus::Booked => 'x',
            SeatStatus::LockedByOther => '!',
            SeatStatus::Selected | SeatStatus::LockedBySelf => '*',
            SeatStatus::Available => '.',
        };
        print!("{} ", glyph);
    }
    println!();

    let selected = session.selected();
    let summary = session.summary();
    let seats: Vec<String> = selected.iter().map(ToString::to_string).collect();
    println!(
        "sold: {}  selected: [{}]  subtotal: ${:.2}  total with fees: ${:.2}",
        session.booked_count(),
        seats.join(", "),
        summary.subtotal,
        summary.total
    );
}
