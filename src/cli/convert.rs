use super::{find_asset, ui};
use crate::core::convert::convert;
use crate::core::market::MarketDataProvider;
use anyhow::Result;
use comfy_table::Cell;

/// Converts an amount between two assets at current spot prices.
pub async fn run(
    provider: &(dyn MarketDataProvider),
    amount: f64,
    from_id: &str,
    to_id: &str,
) -> Result<()> {
    let assets = provider.list_assets().await?;

    let from = find_asset(&assets, from_id)?;
    let to = find_asset(&assets, to_id)?;

    let result = convert(Some(amount), Some(from), Some(to));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("Converted"),
        ui::header_cell("To"),
    ]);
    table.add_row(vec![
        ui::value_cell(format!("{amount}")),
        Cell::new(from.display_symbol()),
        ui::value_cell(ui::format_coin_amount(result.converted_amount)),
        Cell::new(to.display_symbol()),
    ]);
    println!("{table}");

    println!(
        "\n1 {} = {} {}",
        from.display_symbol(),
        ui::format_coin_amount(result.unit_rate),
        to.display_symbol()
    );

    if to.current_price_usd == 0.0 {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "No spot price available for {} yet; showing a zero result.",
                    to.display_symbol()
                ),
                ui::StyleType::Subtle
            )
        );
    }

    Ok(())
}
