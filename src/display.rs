//! Display sink abstraction and render payload construction

use crate::{
    config::PrecisionTable,
    error::DisplayError,
    types::{ChangeFields, CoinSet, LabeledChange, PriceSnapshot, RenderPayload},
};
use std::io::Write;

/// Trait for the screen the ticker draws on
///
/// The sink owns all layout; the core only hands it semantic payloads.
pub trait DisplaySink {
    /// Brings the display up; failure here stops the ticker
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Draws one coin
    fn render(&mut self, payload: &RenderPayload) -> Result<(), DisplayError>;

    /// Shows a one-line status message (boot splash)
    fn show_status(&mut self, message: &str) -> Result<(), DisplayError>;
}

/// Builds the payload for the coin at `index`
///
/// Changes are listed in the order of `changes.windows()`; a window missing
/// from the snapshot (nothing fetched yet) is left out.
pub fn render_payload(
    coins: &CoinSet,
    index: usize,
    snapshot: &PriceSnapshot,
    changes: ChangeFields,
    precision: &PrecisionTable,
) -> Option<RenderPayload> {
    let coin = coins.get(index)?;

    let changes = changes
        .windows()
        .iter()
        .filter_map(|window| {
            snapshot.change(*window).map(|percent| LabeledChange {
                label: window.label(),
                percent,
            })
        })
        .collect();

    Some(RenderPayload {
        index,
        symbol: coin.symbol,
        icon: coin.icon,
        price_usd: snapshot.price_usd,
        price_text: precision.format(snapshot.price_usd),
        changes,
    })
}

/// One console line for a payload
pub fn format_frame(payload: &RenderPayload) -> String {
    let changes = payload
        .changes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "[{}] {:<5} {:>14}  {}",
        payload.icon.0, payload.symbol, payload.price_text, changes
    )
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), DisplayError> {
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

/// Sink that writes one line per frame to stdout
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn render(&mut self, payload: &RenderPayload) -> Result<(), DisplayError> {
        write_line(&mut std::io::stdout().lock(), &format_frame(payload))
    }

    fn show_status(&mut self, message: &str) -> Result<(), DisplayError> {
        write_line(&mut std::io::stdout().lock(), message)
    }
}
