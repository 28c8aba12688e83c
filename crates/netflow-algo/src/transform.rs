//! Input → modeling dataset transform.
//!
//! Supply and demand collapse into one signed `inflow` table: supply rows keep
//! their quantity, demand rows are negated. The shared network tables pass
//! through unchanged.

use netflow_core::{check_integrity, InputDat, ModelingDat, NetflowResult, QuantityRow, Schema};
use tracing::debug;

/// Build the modeling dataset from an input dataset that has passed `schema`.
///
/// Fails with the first failing integrity check if `dat` is not a good
/// input dataset; the transform itself cannot fail.
pub fn input_to_modeling(schema: &Schema, dat: &InputDat) -> NetflowResult<ModelingDat> {
    check_integrity(schema, dat)?;
    Ok(merge_inflow(dat))
}

/// The transform proper. Supply/demand pairs are disjoint on valid data, so
/// every supply or demand row yields exactly one inflow row.
pub(crate) fn merge_inflow(dat: &InputDat) -> ModelingDat {
    let inflow: Vec<QuantityRow> = dat
        .supply
        .iter()
        .cloned()
        .chain(dat.demand.iter().map(|row| QuantityRow {
            quantity: -row.quantity,
            ..row.clone()
        }))
        .collect();

    debug!(
        supply = dat.supply.len(),
        demand = dat.demand.len(),
        "merged supply and demand into inflow"
    );

    ModelingDat {
        commodities: dat.commodities.clone(),
        nodes: dat.nodes.clone(),
        arcs: dat.arcs.clone(),
        cost: dat.cost.clone(),
        inflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netflow_core::{input_schema, ArcRow, CommodityRow, CostRow, IntegrityCheck, NodeRow};

    fn dat() -> InputDat {
        InputDat {
            commodities: vec![CommodityRow::new("Pens", 1.0)],
            nodes: vec![
                NodeRow::new("Detroit"),
                NodeRow::new("Denver"),
                NodeRow::new("Boston"),
            ],
            arcs: vec![
                ArcRow::new("Detroit", "Boston", 100.0),
                ArcRow::new("Denver", "Boston", 120.0),
            ],
            cost: vec![
                CostRow::new("Pens", "Detroit", "Boston", 20.0),
                CostRow::new("Pens", "Denver", "Boston", 60.0),
            ],
            supply: vec![
                QuantityRow::new("Pens", "Detroit", 60.0),
                QuantityRow::new("Pens", "Denver", 40.0),
            ],
            demand: vec![QuantityRow::new("Pens", "Boston", 70.0)],
        }
    }

    #[test]
    fn inflow_carries_signed_quantities() {
        let modeling = input_to_modeling(&input_schema(), &dat()).unwrap();
        assert_eq!(
            modeling.inflow,
            vec![
                QuantityRow::new("Pens", "Detroit", 60.0),
                QuantityRow::new("Pens", "Denver", 40.0),
                QuantityRow::new("Pens", "Boston", -70.0),
            ]
        );
        let input = dat();
        assert_eq!(modeling.commodities, input.commodities);
        assert_eq!(modeling.nodes, input.nodes);
        assert_eq!(modeling.arcs, input.arcs);
        assert_eq!(modeling.cost, input.cost);
    }

    #[test]
    fn inflow_total_is_supply_minus_demand() {
        let input = dat();
        let modeling = merge_inflow(&input);
        let inflow: f64 = modeling.inflow.iter().map(|r| r.quantity).sum();
        let supply: f64 = input.supply.iter().map(|r| r.quantity).sum();
        let demand: f64 = input.demand.iter().map(|r| r.quantity).sum();
        assert_eq!(inflow, supply - demand);
    }

    #[test]
    fn zero_demand_row_still_maps_to_one_inflow_row() {
        let mut input = dat();
        input.demand.push(QuantityRow::new("Pens", "Denver", 0.0));
        input.supply.retain(|r| r.node != "Denver");
        let modeling = merge_inflow(&input);
        let rows = input.supply.len() + input.demand.len();
        assert_eq!(modeling.inflow.len(), rows);
    }

    #[test]
    fn refuses_unvalidated_input() {
        let mut input = dat();
        input.supply.push(QuantityRow::new("Pens", "Boston", 1.0));
        let err = input_to_modeling(&input_schema(), &input).unwrap_err();
        assert_eq!(err.integrity_check(), Some(IntegrityCheck::DataRow));
    }
}
