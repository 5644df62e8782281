mod parties;
mod spheres;

use anyhow::Result;
use rust_decimal::Decimal;
use std::rc::Rc;

use crate::store::{RecordStore, Selection, StoreSummary};

pub(crate) use parties::{fee_efficiency, fee_ratios, supplier_diversification, FeeRatio, SupplierDiversity};
pub(crate) use spheres::{
    category_by_sphere, composition_by_sphere, hierarchy_tree, sphere_hierarchy,
    CategoryShare, CategorySphereTotal, HierarchyLeaf, PartyNode, SphereNode,
};

/// Limits and thresholds for the six charts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MetricsConfig {
    pub(crate) category_top: usize,
    /// `None` shows every party under every sphere.
    pub(crate) hierarchy_parties: Option<usize>,
    pub(crate) composition_top: usize,
    pub(crate) fee_category: String,
    pub(crate) scatter_min_spend: Decimal,
    pub(crate) efficiency_min_spend: Decimal,
    pub(crate) efficiency_limit: usize,
    pub(crate) diversification_min_spend: Decimal,
    pub(crate) diversification_limit: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            category_top: 6,
            hierarchy_parties: Some(3),
            composition_top: 5,
            fee_category: "TARIFAS BANCÁRIAS".into(),
            scatter_min_spend: Decimal::from(10_000),
            efficiency_min_spend: Decimal::from(50_000),
            efficiency_limit: 15,
            diversification_min_spend: Decimal::from(100_000),
            diversification_limit: 15,
        }
    }
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DashboardMetrics {
    pub(crate) summary: StoreSummary,
    pub(crate) category_totals: Vec<CategorySphereTotal>,
    pub(crate) hierarchy: Vec<HierarchyLeaf>,
    pub(crate) composition: Vec<CategoryShare>,
    pub(crate) fee_ratios: Vec<FeeRatio>,
    pub(crate) efficiency: Vec<FeeRatio>,
    pub(crate) diversification: Vec<SupplierDiversity>,
}

impl DashboardMetrics {
    pub(crate) fn compute(store: &RecordStore, config: &MetricsConfig) -> Self {
        Self {
            summary: store.summary(),
            category_totals: category_by_sphere(store, config.category_top),
            hierarchy: sphere_hierarchy(store, config.hierarchy_parties),
            composition: composition_by_sphere(store, config.composition_top),
            fee_ratios: fee_ratios(store, &config.fee_category, config.scatter_min_spend),
            efficiency: fee_efficiency(
                store,
                &config.fee_category,
                config.efficiency_min_spend,
                config.efficiency_limit,
            ),
            diversification: supplier_diversification(
                store,
                config.diversification_min_spend,
                config.diversification_limit,
            ),
        }
    }
}

/// Remembers the metrics of the last selection so an unchanged filter does
/// not recompute.
#[derive(Debug, Default)]
pub(crate) struct MetricsCache {
    last: Option<(Selection, Rc<DashboardMetrics>)>,
}

impl MetricsCache {
    pub(crate) fn get_or_compute(
        &mut self,
        base: &RecordStore,
        selection: &Selection,
        config: &MetricsConfig,
    ) -> Result<Rc<DashboardMetrics>> {
        if let Some((cached, metrics)) = &self.last {
            if cached == selection {
                log::debug!("Metrics cache hit");
                return Ok(Rc::clone(metrics));
            }
        }

        let filtered = base.filter(selection)?;
        log::debug!("Recomputing metrics over {} rows", filtered.len());
        let metrics = Rc::new(DashboardMetrics::compute(&filtered, config));
        self.last = Some((selection.clone(), Rc::clone(&metrics)));
        Ok(metrics)
    }

    pub(crate) fn clear(&mut self) {
        self.last = None;
    }
}
