use super::ui;
use crate::core::market::MarketDataProvider;
use anyhow::Result;
use comfy_table::Cell;

/// Lists the provider's ranked asset snapshot with current spot prices.
pub async fn run(provider: &(dyn MarketDataProvider)) -> Result<()> {
    let assets = provider.list_assets().await?;

    if assets.is_empty() {
        println!("No assets returned by the market data provider.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Price (USD)"),
    ]);

    for (rank, asset) in assets.iter().enumerate() {
        let price = if asset.current_price_usd == 0.0 {
            Cell::new("N/A")
        } else {
            ui::value_cell(ui::format_usd_price(asset.current_price_usd))
        };
        table.add_row(vec![
            ui::value_cell(format!("{}", rank + 1)),
            Cell::new(asset.display_symbol()),
            Cell::new(&asset.name),
            price,
        ]);
    }

    println!("{table}");
    Ok(())
}
