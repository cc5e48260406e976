//! Chart rendering port trait.

use std::path::Path;

use crate::domain::dashboard::PriceChart;
use crate::domain::error::DashboardError;
use crate::domain::portfolio::AllocationSlice;

pub trait ChartPort {
    fn render_price_chart(&self, chart: &PriceChart, output: &Path) -> Result<(), DashboardError>;

    fn render_allocation(
        &self,
        slices: &[AllocationSlice],
        output: &Path,
    ) -> Result<(), DashboardError>;
}
