//! Column schema of the epidemiological model's CSV output

use crate::table::{ColumnKind, ColumnSchema};

/// Name of the per-trial step counter column
pub const STEP_COLUMN: &str = "Step";

/// Floating point quantities tracked per step
pub const TRACKED_QUANTITIES: &[&str] = &[
    "Susceptible",
    "Exposed",
    "Asymptomatic",
    "SymptQuarantined",
    "AsymptQuarantined",
    "Severe",
    "Recovered",
    "Deceased",
    "Isolated",
    "CumulPrivValue",
    "CumulPublValue",
    "CumulTestCost",
    "Rt",
    "Employed",
    "Unemployed",
];

/// Samples the model records per simulated day
pub const DEFAULT_STEPS_PER_DAY: usize = 96;

/// Full header of a model run, in file order
pub fn simulation_schema() -> ColumnSchema {
    let schema = ColumnSchema::new()
        .with_column("A", ColumnKind::Int)
        .with_column(STEP_COLUMN, ColumnKind::Int)
        .with_column("N", ColumnKind::Int);

    TRACKED_QUANTITIES
        .iter()
        .fold(schema, |schema, name| schema.with_column(*name, ColumnKind::Float))
        .with_column("Tested", ColumnKind::Int)
        .with_column("Traced", ColumnKind::Int)
        .with_column("Iteration", ColumnKind::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_schema_order() {
        let schema = simulation_schema();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names.len(), 21);
        assert_eq!(&names[..4], &["A", "Step", "N", "Susceptible"]);
        assert_eq!(names.last(), Some(&"Iteration"));
        assert_eq!(schema.kind("Rt"), Some(ColumnKind::Float));
        assert_eq!(schema.kind("Traced"), Some(ColumnKind::Int));
    }
}
