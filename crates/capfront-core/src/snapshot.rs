//! Per-user cached mirror of the remote simulation tables.
//!
//! Tables are small and per-user, so relationships are resolved by linear
//! scan rather than by an index. Every lookup that can miss returns a
//! sentinel record; display code never has to handle an absent value.

use serde::Serialize;

use crate::model::{
    Class, ClassStock, Commodity, Industry, IndustryStock, Keyed, NOT_FOUND_CLASS,
    NOT_FOUND_COMMODITY, NOT_FOUND_INDUSTRY, NOT_FOUND_SIMULATION, NOT_FOUND_STOCK, OwnerType,
    RecordId, Simulation, Stock, Trace, usage,
};

const UNKNOWN_COMMODITY: &str = "UNKNOWN COMMODITY";
const UNKNOWN_OWNER: &str = "UNKNOWN OWNER";
const LABOUR_POWER: &str = "Labour Power";
const MEANS_OF_PRODUCTION: &str = "Means of Production";

/// The cached datasets of one user.
///
/// Every field starts out as an empty list; a dataset is wholesale-replaced
/// by each successful fetch and left untouched by a failed one.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    pub simulations: Vec<Simulation>,
    pub commodities: Vec<Commodity>,
    pub industries: Vec<Industry>,
    pub classes: Vec<Class>,
    pub stocks: Vec<Stock>,
    pub industry_stocks: Vec<IndustryStock>,
    pub class_stocks: Vec<ClassStock>,
    pub traces: Vec<Trace>,
}

fn find<T: Keyed>(records: &[T], id: RecordId) -> Option<&T> {
    records.iter().find(|record| record.id() == id)
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no dataset holds any record.
    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
            && self.commodities.is_empty()
            && self.industries.is_empty()
            && self.classes.is_empty()
            && self.stocks.is_empty()
            && self.industry_stocks.is_empty()
            && self.class_stocks.is_empty()
            && self.traces.is_empty()
    }

    /// Empties every dataset, keeping the container itself.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ============================================================================
    // Direct lookups
    // ============================================================================

    pub fn simulation(&self, id: RecordId) -> &Simulation {
        find(&self.simulations, id).unwrap_or(&*NOT_FOUND_SIMULATION)
    }

    /// Mutable access for the advisory state advance; `None` when absent.
    pub fn simulation_mut(&mut self, id: RecordId) -> Option<&mut Simulation> {
        self.simulations.iter_mut().find(|sim| sim.id == id)
    }

    pub fn commodity(&self, id: RecordId) -> &Commodity {
        find(&self.commodities, id).unwrap_or(&*NOT_FOUND_COMMODITY)
    }

    pub fn industry(&self, id: RecordId) -> &Industry {
        find(&self.industries, id).unwrap_or(&*NOT_FOUND_INDUSTRY)
    }

    pub fn class(&self, id: RecordId) -> &Class {
        find(&self.classes, id).unwrap_or(&*NOT_FOUND_CLASS)
    }

    pub fn stock(&self, id: RecordId) -> &Stock {
        find(&self.stocks, id).unwrap_or(&*NOT_FOUND_STOCK)
    }

    // ============================================================================
    // Stock relationships
    // ============================================================================

    /// The commodity a stock consists of.
    pub fn stock_commodity(&self, stock: &Stock) -> &Commodity {
        self.commodity(stock.commodity_id)
    }

    pub fn stock_commodity_name(&self, stock: &Stock) -> &str {
        self.commodity_name(stock.commodity_id)
    }

    /// Name of the industry or class that owns a stock.
    pub fn stock_owner_name(&self, stock: &Stock) -> &str {
        let name = match stock.owner_kind() {
            OwnerType::Industry => find(&self.industries, stock.owner_id).map(|i| i.name.as_str()),
            OwnerType::Class => find(&self.classes, stock.owner_id).map(|c| c.name.as_str()),
            OwnerType::Unknown => None,
        };
        name.unwrap_or(UNKNOWN_OWNER)
    }

    fn commodity_name(&self, commodity_id: RecordId) -> &str {
        find(&self.commodities, commodity_id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_COMMODITY)
    }

    fn owned_stock(
        &self,
        owner: OwnerType,
        owner_id: RecordId,
        usage_type: &str,
        commodity_name: Option<&str>,
    ) -> &Stock {
        self.stocks
            .iter()
            .find(|s| {
                s.owner_kind() == owner
                    && s.owner_id == owner_id
                    && s.usage_type == usage_type
                    && commodity_name.is_none_or(|name| self.commodity_name(s.commodity_id) == name)
            })
            .unwrap_or(&*NOT_FOUND_STOCK)
    }

    // ============================================================================
    // Industry relationships
    // ============================================================================

    pub fn industry_money_stock(&self, industry: &Industry) -> &Stock {
        self.owned_stock(OwnerType::Industry, industry.id, usage::MONEY, None)
    }

    pub fn industry_sales_stock(&self, industry: &Industry) -> &Stock {
        self.owned_stock(OwnerType::Industry, industry.id, usage::SALES, None)
    }

    /// The labour power an industry holds for production.
    pub fn industry_variable_capital(&self, industry: &Industry) -> &Stock {
        self.owned_stock(
            OwnerType::Industry,
            industry.id,
            usage::PRODUCTION,
            Some(LABOUR_POWER),
        )
    }

    /// The means of production an industry holds. Assumes there is only one.
    pub fn industry_constant_capital(&self, industry: &Industry) -> &Stock {
        self.owned_stock(
            OwnerType::Industry,
            industry.id,
            usage::PRODUCTION,
            Some(MEANS_OF_PRODUCTION),
        )
    }

    /// The commodity an industry produces, found through its sales stock.
    pub fn industry_output_commodity(&self, industry: &Industry) -> &Commodity {
        self.stock_commodity(self.industry_sales_stock(industry))
    }

    // ============================================================================
    // Class relationships
    // ============================================================================

    pub fn class_money_stock(&self, class: &Class) -> &Stock {
        self.owned_stock(OwnerType::Class, class.id, usage::MONEY, None)
    }

    pub fn class_sales_stock(&self, class: &Class) -> &Stock {
        self.owned_stock(OwnerType::Class, class.id, usage::SALES, None)
    }

    pub fn class_consumption_stock(&self, class: &Class) -> &Stock {
        self.owned_stock(OwnerType::Class, class.id, usage::CONSUMPTION, None)
    }

    // ============================================================================
    // Split stock tables
    // ============================================================================

    pub fn industry_stock_owner(&self, stock: &IndustryStock) -> &Industry {
        self.industry(stock.industry_id)
    }

    pub fn industry_stock_commodity_name(&self, stock: &IndustryStock) -> &str {
        self.commodity_name(stock.commodity_id)
    }

    pub fn class_stock_owner(&self, stock: &ClassStock) -> &Class {
        self.class(stock.class_id)
    }

    pub fn class_stock_commodity_name(&self, stock: &ClassStock) -> &str {
        self.commodity_name(stock.commodity_id)
    }

    /// Traces belonging to one simulation, in server order.
    pub fn traces_for(&self, simulation_id: RecordId) -> impl Iterator<Item = &Trace> {
        self.traces
            .iter()
            .filter(move |t| t.simulation_id == simulation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOT_FOUND_NAME;

    fn fixture() -> Snapshot {
        Snapshot {
            commodities: vec![
                Commodity {
                    id: 1,
                    name: "Means of Production".into(),
                    ..Commodity::default()
                },
                Commodity {
                    id: 2,
                    name: "Labour Power".into(),
                    ..Commodity::default()
                },
                Commodity {
                    id: 3,
                    name: "Money".into(),
                    ..Commodity::default()
                },
            ],
            industries: vec![Industry {
                id: 10,
                name: "Steel".into(),
                ..Industry::default()
            }],
            classes: vec![Class {
                id: 10,
                name: "Workers".into(),
                ..Class::default()
            }],
            stocks: vec![
                Stock {
                    id: 100,
                    owner_id: 10,
                    owner_type: "Industry".into(),
                    usage_type: "Production".into(),
                    commodity_id: 2,
                    size: 5.0,
                    ..Stock::default()
                },
                Stock {
                    id: 101,
                    owner_id: 10,
                    owner_type: "Industry".into(),
                    usage_type: "Production".into(),
                    commodity_id: 1,
                    size: 7.0,
                    ..Stock::default()
                },
                Stock {
                    id: 102,
                    owner_id: 10,
                    owner_type: "Class".into(),
                    usage_type: "Money".into(),
                    commodity_id: 3,
                    ..Stock::default()
                },
                Stock {
                    id: 103,
                    owner_id: 10,
                    owner_type: "Industry".into(),
                    usage_type: "Sales".into(),
                    commodity_id: 1,
                    ..Stock::default()
                },
                Stock {
                    id: 104,
                    owner_id: 99,
                    owner_type: "Industry".into(),
                    usage_type: "Money".into(),
                    commodity_id: 42,
                    ..Stock::default()
                },
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_new_snapshot_is_empty_not_absent() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.simulations.len(), 0);
    }

    #[test]
    fn test_missing_owner_returns_sentinel() {
        let snapshot = fixture();
        let orphan = snapshot.stock(104);
        assert_eq!(snapshot.industry(orphan.owner_id).name, NOT_FOUND_NAME);
        assert_eq!(snapshot.stock_owner_name(orphan), "UNKNOWN OWNER");
        assert_eq!(snapshot.stock_commodity_name(orphan), "UNKNOWN COMMODITY");
        assert_eq!(snapshot.stock_commodity(orphan).id, 0);
    }

    #[test]
    fn test_missing_stock_returns_sentinel() {
        let snapshot = fixture();
        assert!(snapshot.stock(9999).is_sentinel());
        let steel = snapshot.industry(10).clone();
        assert!(snapshot.industry_money_stock(&steel).is_sentinel());
    }

    #[test]
    fn test_capital_stocks_resolve_by_commodity_name() {
        let snapshot = fixture();
        let steel = snapshot.industry(10).clone();
        assert_eq!(snapshot.industry_variable_capital(&steel).id, 100);
        assert_eq!(snapshot.industry_constant_capital(&steel).id, 101);
        assert_eq!(
            snapshot.industry_output_commodity(&steel).name,
            "Means of Production"
        );
    }

    #[test]
    fn test_owner_type_disambiguates_shared_ids() {
        let snapshot = fixture();
        let workers = snapshot.class(10).clone();
        assert_eq!(snapshot.class_money_stock(&workers).id, 102);
        assert_eq!(snapshot.stock_owner_name(snapshot.stock(102)), "Workers");
        assert_eq!(snapshot.stock_owner_name(snapshot.stock(100)), "Steel");
    }

    #[test]
    fn test_class_stocks_by_usage() {
        let mut snapshot = fixture();
        snapshot.stocks.push(Stock {
            id: 105,
            owner_id: 10,
            owner_type: "Class".into(),
            usage_type: "Sales".into(),
            commodity_id: 2,
            ..Stock::default()
        });
        let workers = snapshot.class(10).clone();
        assert_eq!(snapshot.class_sales_stock(&workers).id, 105);
        assert_eq!(
            snapshot.stock_commodity_name(snapshot.stock(105)),
            "Labour Power"
        );
        assert!(snapshot.class_consumption_stock(&workers).is_sentinel());
    }

    #[test]
    fn test_traces_filtered_by_simulation() {
        let mut snapshot = fixture();
        snapshot.traces = vec![
            Trace {
                id: 1,
                simulation_id: 5,
                ..Trace::default()
            },
            Trace {
                id: 2,
                simulation_id: 6,
                ..Trace::default()
            },
            Trace {
                id: 3,
                simulation_id: 5,
                ..Trace::default()
            },
        ];
        let ids: Vec<RecordId> = snapshot.traces_for(5).map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(snapshot.traces_for(9).count(), 0);
    }

    #[test]
    fn test_simulation_mut_absent_is_none() {
        let mut snapshot = fixture();
        assert!(snapshot.simulation_mut(5).is_none());
        assert_eq!(snapshot.simulation(5).name, NOT_FOUND_NAME);
    }

    #[test]
    fn test_split_stock_owner_lookup() {
        let snapshot = fixture();
        let stock = IndustryStock {
            industry_id: 77,
            commodity_id: 2,
            ..IndustryStock::default()
        };
        assert_eq!(snapshot.industry_stock_owner(&stock).name, NOT_FOUND_NAME);
        assert_eq!(
            snapshot.industry_stock_commodity_name(&stock),
            "Labour Power"
        );
    }
}
