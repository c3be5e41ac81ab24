use crate::shared::marketplaces::trendyol::{is_last_page, page_content};
use crate::shared::marketplaces::{MarketplaceSource, SourceError};

use super::cargo_map::CargoMaps;

/// Read every page of the given cargo invoices into one set of maps
pub async fn load_cargo_maps(
    source: &dyn MarketplaceSource,
    serials: &[String],
    page_size: u32,
    max_pages: u32,
) -> Result<CargoMaps, SourceError> {
    let mut maps = CargoMaps::default();

    for serial in serials.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let mut page: u32 = 0;
        loop {
            let body = source.fetch_cargo_invoice_page(serial, page, page_size).await?;
            let content = page_content(&body);
            maps.add_items(content);

            // without totalPages an empty page is the end
            if body.get("totalPages").is_some() {
                if is_last_page(&body, page) {
                    break;
                }
            } else if content.is_empty() {
                break;
            }

            page += 1;
            if page >= max_pages {
                tracing::warn!(
                    "Cargo invoice {}: reached maximum page limit ({})",
                    serial,
                    max_pages
                );
                break;
            }
        }
    }

    tracing::info!(
        "Cargo maps: {} order numbers, {} parcels from {} invoice(s)",
        maps.by_order_number.len(),
        maps.by_parcel_id.len(),
        serials.len()
    );
    Ok(maps)
}
