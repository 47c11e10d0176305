use anyhow::Context;
use clap::Parser;
use comfy_table::Table;
use core_types::{OrderBook, OrderSide, OwnTrade, Product, TickInput};
use engine::DecisionEngine;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Arguments for the `run` command.
#[derive(Parser)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 2000)]
    ticks: i64,
}

/// Drives the engine through a deterministic synthetic market.
///
/// This is a wiring demonstration, not a backtester: prices follow fixed
/// triangle waves, the external observation steps up once mid-session, and a
/// marketable order simply fills in full at the touch it crosses. Its only
/// job is to exercise every component end-to-end.
pub fn run_session(args: RunArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;
    let tick_interval = config.engine.tick_interval;
    let mut engine = DecisionEngine::new(config)?;

    tracing::info!(ticks = args.ticks, "starting synthetic session");

    let progress = ProgressBar::new(args.ticks as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("=>-"),
    );

    let mut positions: HashMap<Product, i64> = HashMap::new();
    let mut pending_trades: HashMap<Product, Vec<OwnTrade>> = HashMap::new();
    let mut last_mids: HashMap<Product, Decimal> = HashMap::new();

    for i in 0..args.ticks {
        let timestamp = i * tick_interval;
        let books = synthetic_books(i);
        for (product, book) in &books {
            if let Some(mid) = book.mid() {
                last_mids.insert(*product, mid);
            }
        }

        let input = TickInput {
            timestamp,
            books,
            positions: positions.clone(),
            own_trades: std::mem::take(&mut pending_trades),
            observation: Some(observation_at(i)),
        };
        let output = engine.process_tick(&input);

        // Naive fill model: a marketable order fills in full at the touch it
        // crosses; everything else rests and expires with the tick. Fills are
        // reported back on the next tick, the way the harness would.
        for orders in output.orders.values() {
            for order in orders {
                let Some(book) = input.books.get(&order.product) else {
                    continue;
                };
                let Some(side) = order.side() else {
                    continue;
                };
                let fill = match side {
                    OrderSide::Buy => book.best_ask().filter(|ask| order.price >= *ask),
                    OrderSide::Sell => book.best_bid().filter(|bid| order.price <= *bid),
                };
                if let Some(price) = fill {
                    *positions.entry(order.product).or_insert(0) += order.quantity;
                    pending_trades
                        .entry(order.product)
                        .or_default()
                        .push(OwnTrade {
                            product: order.product,
                            side,
                            price,
                            quantity: order.quantity.abs(),
                            timestamp,
                        });
                }
            }
        }

        progress.inc(1);
    }
    progress.finish_with_message("session complete");

    print_summary(&engine, &positions, &last_mids);
    Ok(())
}

/// Triangle wave in [-amplitude, +amplitude] with the given period.
fn wave(i: i64, period: i64, amplitude: i64) -> Decimal {
    let pos = i.rem_euclid(period);
    let half = period / 2;
    let raw = if pos < half { pos } else { period - pos };
    Decimal::from(amplitude * (2 * raw - half)) / Decimal::from(half)
}

/// Tight two-sided books around slowly drifting mids for every product.
fn synthetic_books(i: i64) -> HashMap<Product, OrderBook> {
    let cacao = dec!(8000) + wave(i, 80, 12);
    // The cordial leg tracks the hedge ratio with a slow residual wave, so
    // the spread mean-reverts on a cycle the long window can see.
    let cordial = dec!(1.551) * cacao + dec!(2600) + wave(i, 460, 45);

    let mids = [
        (Product::Abalone, dec!(10000) + wave(i, 50, 4)),
        (Product::Breadfruit, dec!(5000) + wave(i, 90, 30)),
        (Product::Cacao, cacao),
        (Product::Cordial, cordial),
        (Product::Guava, dec!(3900) + wave(i, 100, 20)),
        (Product::Sextant, dec!(99000) + wave(i, 120, 150)),
    ];

    mids.into_iter()
        .map(|(product, mid)| {
            let mut book = OrderBook::default();
            book.bids.insert(mid - dec!(2), 40);
            book.asks.insert(mid + dec!(2), 40);
            (product, book)
        })
        .collect()
}

/// The external correlated signal: flat, with one +2% step mid-session and a
/// step back down later.
fn observation_at(i: i64) -> Decimal {
    if (300..800).contains(&i) {
        dec!(3111)
    } else {
        dec!(3050)
    }
}

fn print_summary(
    engine: &DecisionEngine,
    positions: &HashMap<Product, i64>,
    last_mids: &HashMap<Product, Decimal>,
) {
    let mut table = Table::new();
    table.set_header(vec!["Product", "Position", "Last Mid", "EMA"]);
    for product in Product::ALL {
        let position = positions.get(&product).copied().unwrap_or(0);
        let mid = last_mids
            .get(&product)
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let ema = engine
            .estimator()
            .ema(product)
            .map(|e| e.round_dp(2).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            product.to_string(),
            position.to_string(),
            mid,
            ema,
        ]);
    }

    let marked = engine.portfolio().mark_to_market(positions, last_mids);
    println!("{table}");
    println!(
        "Cash: {}  |  Mark-to-market: {}",
        engine.portfolio().cash().round_dp(2),
        marked.round_dp(2)
    );
}
