use invoice_draft::{AdjustmentMode, InvoiceDraft, ItemField, ItemList, TotalPolicy};
use proptest::prelude::*;

fn build_list(lines: &[(String, u32, u32)]) -> ItemList {
    let mut list = ItemList::new();
    for (i, (name, qty, cents)) in lines.iter().enumerate() {
        list.add_item();
        list.update_field(i, ItemField::Name, name);
        list.update_field(i, ItemField::Quantity, &qty.to_string());
        list.update_field(i, ItemField::UnitCost, &format!("{}.{:02}", cents / 100, cents % 100));
        if i % 2 == 0 {
            list.toggle_description(i);
        }
    }
    list
}

fn sorted_snapshot(list: &ItemList) -> Vec<String> {
    let mut rows: Vec<String> = list
        .iter()
        .map(|item| {
            format!(
                "{}|{}|{}|{}|{}",
                item.id(),
                item.name,
                item.quantity(),
                item.unit_cost(),
                item.show_description
            )
        })
        .collect();
    rows.sort();
    rows
}

proptest! {
    #[test]
    fn prop_reorder_preserves_items_and_attributes(
        lines in proptest::collection::vec(("[a-z]{0,6}", 0..50u32, 0..100_000u32), 1..12),
        source in 0..12usize,
        destination in 0..12usize,
    ) {
        let mut list = build_list(&lines);
        let before = sorted_snapshot(&list);
        let moved_id = list.get(source).map(|item| item.id().clone());

        let applied = list.reorder(source, Some(destination));

        prop_assert_eq!(sorted_snapshot(&list), before);
        prop_assert_eq!(list.len(), lines.len());
        if applied {
            let moved_id = moved_id.unwrap();
            prop_assert_eq!(list.position(&moved_id), Some(destination));
        } else {
            prop_assert!(source >= lines.len() || destination >= lines.len());
        }
    }

    #[test]
    fn prop_cancelled_reorder_is_a_no_op(
        lines in proptest::collection::vec(("[a-z]{1,6}", 0..50u32, 0..100_000u32), 1..8),
        source in 0..8usize,
    ) {
        let mut list = build_list(&lines);
        let before = list.clone();
        prop_assert!(!list.reorder(source, None));
        prop_assert_eq!(list, before);
    }

    #[test]
    fn prop_subtotal_is_sum_of_line_totals(
        lines in proptest::collection::vec(("[a-z]{0,6}", 0..50u32, 0..100_000u32), 0..12),
    ) {
        let mut draft = InvoiceDraft::new();
        draft.items = build_list(&lines);

        let expected: f64 = draft
            .items
            .iter()
            .map(|item| item.quantity() * item.unit_cost())
            .sum();
        prop_assert!((draft.subtotal() - expected).abs() < 1e-6);
        prop_assert!(draft.subtotal() >= 0.0);
    }

    #[test]
    fn prop_floor_policy_never_reports_negative_total(
        lines in proptest::collection::vec(("[a-z]{1,6}", 0..20u32, 0..50_000u32), 0..6),
        discount in 0..1_000_000u32,
        fixed in any::<bool>(),
    ) {
        let mut draft = InvoiceDraft::new();
        draft.items = build_list(&lines);
        draft.discount.enable();
        if fixed {
            draft.discount.set_mode(AdjustmentMode::Fixed);
        }
        draft.discount.set_value(&discount.to_string());

        let floored = draft.totals(TotalPolicy::FloorAtZero);
        let raw = draft.totals(TotalPolicy::Unclamped);

        prop_assert!(floored.total >= 0.0);
        prop_assert_eq!(floored.total, raw.total.max(0.0));
        prop_assert_eq!(floored.discount, raw.discount);
    }

    #[test]
    fn prop_disabled_adjustments_contribute_nothing(
        lines in proptest::collection::vec(("[a-z]{1,6}", 0..20u32, 0..50_000u32), 0..6),
        tax in 0..500u32,
        shipping in 0..500u32,
    ) {
        let mut draft = InvoiceDraft::new();
        draft.items = build_list(&lines);
        draft.tax.set_value(&tax.to_string());
        draft.shipping.set_value(&shipping.to_string());
        draft.tax.disable();
        draft.shipping.disable();

        let totals = draft.totals(TotalPolicy::Unclamped);
        prop_assert_eq!(totals.tax, 0.0);
        prop_assert_eq!(totals.shipping, 0.0);
        prop_assert_eq!(totals.total, totals.subtotal);
    }
}

#[test]
fn test_reorder_example_moves_first_to_last() {
    let mut list = build_list(&[
        ("A".to_string(), 1, 100),
        ("B".to_string(), 1, 200),
        ("C".to_string(), 1, 300),
    ]);
    assert!(list.reorder(0, Some(2)));
    let names: Vec<&str> = list.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}
