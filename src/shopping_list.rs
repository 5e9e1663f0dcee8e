//! Shopping list aggregation: merge every ingredient line across the
//! recipes in a user's cart and render the downloadable text report.

use std::collections::HashMap;

pub const REPORT_FOOTER: &str = "Generated by Potluck";

/// One raw recipe line joined to its ingredient, as read from the store.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub ingredient_name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A merged (name, unit) group with its summed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub ingredient_name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Groups lines by (ingredient name, measurement unit) and sums amounts.
///
/// The key is the descriptive pair, not the ingredient id: two ingredient
/// rows that happen to share name and unit merge into one group. Group
/// order is first-seen input order.
pub fn aggregate(lines: &[CartLine]) -> Vec<AggregatedLine> {
    let mut totals: Vec<AggregatedLine> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for line in lines {
        let key = (line.ingredient_name.clone(), line.measurement_unit.clone());
        match index.get(&key) {
            Some(&i) => totals[i].total_amount += i64::from(line.amount),
            None => {
                index.insert(key, totals.len());
                totals.push(AggregatedLine {
                    ingredient_name: line.ingredient_name.clone(),
                    measurement_unit: line.measurement_unit.clone(),
                    total_amount: i64::from(line.amount),
                });
            }
        }
    }

    totals
}

/// Renders the report: a header naming the user, one line per group, and a
/// fixed trailing footer.
pub fn render_report(full_name: &str, totals: &[AggregatedLine]) -> String {
    let mut report = format!("Shopping list for {}\n\n", full_name);
    for line in totals {
        report.push_str(&format!(
            "{}: {} {}\n",
            line.ingredient_name, line.total_amount, line.measurement_unit
        ));
    }
    report.push('\n');
    report.push_str(REPORT_FOOTER);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, amount: i32, unit: &str) -> CartLine {
        CartLine {
            ingredient_name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn two_recipe_cart_scenario() {
        // R1: (Salt, 5, g), (Sugar, 10, g); R2: (Salt, 3, g)
        let lines = vec![line("Salt", 5, "g"), line("Sugar", 10, "g"), line("Salt", 3, "g")];
        let totals = aggregate(&lines);
        assert_eq!(
            totals,
            vec![
                AggregatedLine {
                    ingredient_name: "Salt".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 8,
                },
                AggregatedLine {
                    ingredient_name: "Sugar".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 10,
                },
            ]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let lines = vec![line("Flour", 200, "g"), line("Milk", 250, "ml"), line("Flour", 100, "g")];
        assert_eq!(aggregate(&lines), aggregate(&lines));
    }

    #[test]
    fn grouped_sum_equals_raw_sum_per_key() {
        let lines = vec![
            line("Salt", 5, "g"),
            line("Salt", 3, "g"),
            line("Salt", 1, "kg"),
            line("Sugar", 10, "g"),
        ];
        let totals = aggregate(&lines);
        for group in &totals {
            let raw: i64 = lines
                .iter()
                .filter(|l| {
                    l.ingredient_name == group.ingredient_name
                        && l.measurement_unit == group.measurement_unit
                })
                .map(|l| i64::from(l.amount))
                .sum();
            assert_eq!(group.total_amount, raw);
        }
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let lines = vec![line("Salt", 5, "g"), line("Salt", 1, "kg")];
        let totals = aggregate(&lines);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn distinct_rows_sharing_name_and_unit_merge() {
        // Two distinct ingredient rows with the same description collapse
        // into one group: the key is descriptive, not the row id.
        let lines = vec![line("Salt", 5, "g"), line("Salt", 5, "g")];
        let totals = aggregate(&lines);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_amount, 10);
    }

    #[test]
    fn order_is_first_seen() {
        let lines = vec![line("Zucchini", 1, "pc"), line("Apple", 2, "pc"), line("Zucchini", 1, "pc")];
        let totals = aggregate(&lines);
        assert_eq!(totals[0].ingredient_name, "Zucchini");
        assert_eq!(totals[1].ingredient_name, "Apple");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn report_format() {
        let totals = vec![
            AggregatedLine {
                ingredient_name: "Salt".to_string(),
                measurement_unit: "g".to_string(),
                total_amount: 8,
            },
            AggregatedLine {
                ingredient_name: "Sugar".to_string(),
                measurement_unit: "g".to_string(),
                total_amount: 10,
            },
        ];
        let report = render_report("Ada Lovelace", &totals);
        assert_eq!(
            report,
            "Shopping list for Ada Lovelace\n\nSalt: 8 g\nSugar: 10 g\n\nGenerated by Potluck"
        );
    }

    #[test]
    fn report_with_no_groups_keeps_header_and_footer() {
        let report = render_report("Ada Lovelace", &[]);
        assert!(report.starts_with("Shopping list for Ada Lovelace\n\n"));
        assert!(report.ends_with(REPORT_FOOTER));
    }
}
