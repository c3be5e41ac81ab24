use std::sync::Arc;

use crate::domain::a002_sku_cost::SkuCostStore;
use crate::projections::p900_cargo_allocation::TariffFallback;
use crate::projections::p901_profit_lines::ReportSettings;
use crate::shared::config::Config;
use crate::shared::marketplaces::MarketplaceSource;

/// Everything a request needs; built once at start, shared read-only
pub struct AppState {
    pub config: Config,
    pub settings: ReportSettings,
    pub source: Arc<dyn MarketplaceSource>,
    pub cost_store: Arc<dyn SkuCostStore>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn MarketplaceSource>,
        cost_store: Arc<dyn SkuCostStore>,
    ) -> SharedState {
        let settings = ReportSettings::from(&config.report);
        Arc::new(Self {
            config,
            settings,
            source,
            cost_store,
        })
    }

    /// Tariff table when the fallback is switched on
    pub fn tariff_fallback(&self) -> Option<TariffFallback> {
        self.config.cargo.tariff_fallback.then(|| TariffFallback {
            default_tariff: self.config.cargo.default_tariff,
            tariffs: self.config.cargo.tariffs.clone(),
        })
    }
}
