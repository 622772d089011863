use super::{find_asset, ui};
use crate::core::market::MarketDataProvider;
use crate::core::profit::{period_summary, point_profit};
use crate::core::series::{AlignedObservation, align};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Compares two assets over a historical window: daily prices, cross-rate,
/// period summary, and latest-vs-start profit breakdown.
pub async fn run(
    provider: &(dyn MarketDataProvider),
    from_id: &str,
    to_id: &str,
    days: u32,
) -> Result<()> {
    let assets = provider.list_assets().await?;
    let from = find_asset(&assets, from_id)?;
    let to = find_asset(&assets, to_id)?;
    let from_symbol = from.display_symbol();
    let to_symbol = to.display_symbol();

    // Both legs fetch concurrently; either failure aborts the comparison
    // with a single fetch error before any alignment runs.
    let pb = ui::new_progress_bar(2, true);
    pb.set_message("Fetching price history...");
    let from_fut = async {
        let result = provider.fetch_daily_series(from_id, days).await;
        pb.inc(1);
        result
    };
    let to_fut = async {
        let result = provider.fetch_daily_series(to_id, days).await;
        pb.inc(1);
        result
    };
    let (from_series, to_series) = futures::try_join!(from_fut, to_fut)
        .with_context(|| format!("Failed to fetch price history for {from_id}/{to_id}"))?;
    pb.finish_and_clear();

    let observations = align(&from_series, &to_series);

    println!(
        "\n{}",
        ui::style_text(
            &format!("{days}-Day Price Comparison: {from_symbol} vs {to_symbol}"),
            ui::StyleType::Title
        )
    );

    if observations.is_empty() {
        println!("No aligned price history available for this pair.");
        return Ok(());
    }

    let start = &observations[0];
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("{from_symbol} (USD)")),
        ui::header_cell(&format!("{to_symbol} (USD)")),
        ui::header_cell(&format!("1 {from_symbol} in {to_symbol}")),
        ui::header_cell("P/L (%)"),
    ]);
    for observation in &observations {
        // Per-point profit against the window start; a zero price on this
        // day renders as N/A rather than aborting the table.
        let profit_cell = match point_profit(observation, start) {
            Ok(profit) => ui::change_cell(profit.ratio_percent),
            Err(_) => ui::na_cell(false),
        };
        table.add_row(vec![
            Cell::new(&observation.date_label),
            ui::value_cell(ui::format_usd_price(observation.from_price_usd)),
            ui::value_cell(ui::format_usd_price(observation.to_price_usd)),
            ui::value_cell(ui::format_coin_amount(observation.cross_rate)),
            profit_cell,
        ]);
    }
    println!("{table}");

    ui::print_separator();

    match period_summary(&observations) {
        Ok(summary) => {
            let change_style = if summary.percent_change >= 0.0 {
                ui::StyleType::Gain
            } else {
                ui::StyleType::Loss
            };
            println!(
                "Rate over {days} days: {} -> {} ({})",
                ui::format_coin_amount(summary.start_rate),
                ui::format_coin_amount(summary.current_rate),
                ui::style_text(&format!("{:+.2}%", summary.percent_change), change_style)
            );
        }
        Err(e) => {
            println!(
                "{}",
                ui::style_text(&format!("Period summary unavailable: {e}"), ui::StyleType::Subtle)
            );
        }
    }

    display_profit(&observations, &from_symbol, &to_symbol);

    Ok(())
}

/// Profit/loss of the latest observation against the window start, in rate,
/// USD, and native-coin denominations.
fn display_profit(observations: &[AlignedObservation], from_symbol: &str, to_symbol: &str) {
    if observations.len() < 2 {
        return;
    }
    let start = &observations[0];
    let current = &observations[observations.len() - 1];

    match point_profit(current, start) {
        Ok(profit) => {
            let label_style = if profit.is_profitable() {
                ui::StyleType::Gain
            } else {
                ui::StyleType::Loss
            };
            println!("\n{}", ui::style_text("Profit/Loss:", label_style));
            println!(
                "  Rate: {} {} ({:+.2}%)",
                ui::format_coin_amount(profit.ratio_delta),
                to_symbol,
                profit.ratio_percent
            );
            println!(
                "  USD: ${:.2} ({:+.2}%)",
                profit.usd_delta, profit.usd_percent
            );
            println!(
                "  {}: {}",
                from_symbol,
                ui::format_coin_amount(profit.from_asset_delta)
            );
            println!(
                "  {}: {}",
                to_symbol,
                ui::format_coin_amount(profit.to_asset_delta)
            );
        }
        Err(e) => {
            println!(
                "\n{}",
                ui::style_text(
                    &format!("Profit/loss unavailable: {e}"),
                    ui::StyleType::Subtle
                )
            );
        }
    }
}
