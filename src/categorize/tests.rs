#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{Rule, Transaction, TxType};
use rust_decimal_macros::dec;

fn make_rule(id: i64, pattern: &str, cat_id: i64, priority: i32) -> Rule {
    let mut rule = Rule::new(pattern, cat_id, priority).unwrap();
    rule.id = Some(id);
    rule
}

fn make_txn(tx_type: TxType, desc: &str) -> Transaction {
    Transaction::new(tx_type, 1, desc.into(), dec!(10.00), "2025-01-15".into())
}

// ── match_category ────────────────────────────────────────────

#[test]
fn test_match_case_insensitive() {
    let rules = vec![make_rule(1, "netflix", 4, 50)];
    assert_eq!(match_category("NETFLIX Subscription", &rules), Some(4));
    assert_eq!(match_category("netflix", &rules), Some(4));
}

#[test]
fn test_match_uppercase_pattern() {
    let rules = vec![make_rule(1, "IFOOD", 1, 50)];
    assert_eq!(match_category("Pedido ifood #123", &rules), Some(1));
}

#[test]
fn test_match_no_match() {
    let rules = vec![make_rule(1, "uber", 2, 50)];
    assert_eq!(match_category("Grocery shopping", &rules), None);
}

#[test]
fn test_match_empty_rules() {
    assert_eq!(match_category("anything", &[]), None);
}

#[test]
fn test_match_empty_description() {
    let rules = vec![make_rule(1, "uber", 2, 50)];
    assert_eq!(match_category("", &rules), None);
}

#[test]
fn test_match_untrimmed_description() {
    let rules = vec![make_rule(1, "uber", 2, 50)];
    assert_eq!(match_category("   uber   ", &rules), Some(2));
}

#[test]
fn test_match_substring_not_word_boundary() {
    let rules = vec![make_rule(1, "bar", 3, 50)];
    assert_eq!(match_category("Barbearia do Zé", &rules), Some(3));
}

#[test]
fn test_match_tie_breaks_on_lowest_id() {
    let rules = vec![
        make_rule(2, "uber eats", 1, 50),
        make_rule(1, "uber", 2, 50),
    ];
    assert_eq!(match_category("Uber eats to office", &rules), Some(2));
}

#[test]
fn test_match_higher_priority_wins_regardless_of_id() {
    let rules = vec![make_rule(1, "ab", 10, 10), make_rule(2, "ab", 90, 90)];
    assert_eq!(match_category("a cab ride", &rules), Some(90));
}

#[test]
fn test_match_non_matching_high_priority_ignored() {
    let rules = vec![make_rule(1, "uber", 2, 10), make_rule(2, "netflix", 4, 100)];
    assert_eq!(match_category("Uber para casa", &rules), Some(2));
}

#[test]
fn test_match_is_deterministic() {
    let rules = vec![
        make_rule(3, "posto", 2, 40),
        make_rule(1, "posto shell", 5, 40),
        make_rule(2, "shell", 6, 40),
    ];
    let first = match_category("POSTO SHELL CENTRO", &rules);
    for _ in 0..10 {
        assert_eq!(match_category("POSTO SHELL CENTRO", &rules), first);
    }
    assert_eq!(first, Some(5));
}

#[test]
fn test_match_independent_of_input_order() {
    let mut rules = vec![
        make_rule(1, "uber", 2, 50),
        make_rule(2, "uber eats", 1, 70),
        make_rule(3, "eats", 7, 70),
    ];
    let expected = match_category("Uber Eats", &rules);
    rules.reverse();
    assert_eq!(match_category("Uber Eats", &rules), expected);
    assert_eq!(expected, Some(1));
}

// ── Categorizer ───────────────────────────────────────────────

#[test]
fn test_categorizer_agrees_with_match_category() {
    let rules = vec![
        make_rule(1, "uber", 2, 50),
        make_rule(2, "uber eats", 1, 50),
        make_rule(3, "eats", 9, 80),
        make_rule(4, "mercado", 1, 20),
    ];
    let cat = Categorizer::new(&rules);
    for desc in ["Uber eats to office", "Uber para casa", "Mercado Livre", "Cinema"] {
        assert_eq!(cat.categorize(desc), match_category(desc, &rules), "{desc}");
    }
}

#[test]
fn test_categorizer_unsaved_rule_loses_tie() {
    let saved = make_rule(9, "uber", 2, 50);
    let unsaved = Rule::new("uber", 3, 50).unwrap();
    let cat = Categorizer::new(&[unsaved, saved]);
    assert_eq!(cat.categorize("UBER"), Some(2));
}

#[test]
fn test_categorize_batch() {
    let rules = vec![make_rule(1, "uber", 2, 50), make_rule(2, "salário", 7, 50)];
    let cat = Categorizer::new(&rules);
    let mut txns = vec![
        make_txn(TxType::Expense, "Uber para trabalho"),
        make_txn(TxType::Income, "Salário mensal"),
        make_txn(TxType::Expense, "Padaria"),
    ];
    assert_eq!(cat.categorize_batch(&mut txns), 2);
    assert_eq!(txns[0].category_id, Some(2));
    assert_eq!(txns[1].category_id, Some(7));
    assert_eq!(txns[2].category_id, None);
}

#[test]
fn test_categorize_batch_preserves_existing() {
    let cat = Categorizer::new(&[make_rule(1, "uber", 2, 50)]);
    let mut txns = vec![make_txn(TxType::Expense, "Uber")];
    txns[0].category_id = Some(99);
    assert_eq!(cat.categorize_batch(&mut txns), 0);
    assert_eq!(txns[0].category_id, Some(99));
}

#[test]
fn test_categorize_batch_skips_transfers() {
    let cat = Categorizer::new(&[make_rule(1, "poupança", 2, 50)]);
    let mut txns = vec![make_txn(TxType::Transfer, "Transferência poupança")];
    assert_eq!(cat.categorize_batch(&mut txns), 0);
    assert_eq!(txns[0].category_id, None);
}

// ── test_pattern ──────────────────────────────────────────────

#[test]
fn test_pattern_preview() {
    let samples = vec!["Uber para casa".to_string(), "Compras mercado".to_string()];
    let result = test_pattern("uber", &samples);
    assert_eq!(
        result,
        vec![
            RuleTestMatch {
                description: "Uber para casa".into(),
                would_apply: true,
            },
            RuleTestMatch {
                description: "Compras mercado".into(),
                would_apply: false,
            },
        ]
    );
}

#[test]
fn test_pattern_preview_keeps_order_and_duplicates() {
    let samples = vec!["b".to_string(), "a".to_string(), "b".to_string()];
    let result = test_pattern("b", &samples);
    let flags: Vec<bool> = result.iter().map(|m| m.would_apply).collect();
    assert_eq!(flags, vec![true, false, true]);
}

#[test]
fn test_pattern_preview_empty_samples() {
    assert!(test_pattern("uber", &[]).is_empty());
}

#[test]
fn test_pattern_preview_is_repeatable() {
    let samples = vec!["Netflix".to_string(), "Spotify".to_string()];
    assert_eq!(test_pattern("NET", &samples), test_pattern("NET", &samples));
}

// ── category_for_new ──────────────────────────────────────────

#[test]
fn test_new_expense_is_auto_categorized() {
    let rules = vec![make_rule(1, "netflix", 4, 50)];
    let txn = make_txn(TxType::Expense, "Netflix");
    assert_eq!(category_for_new(&txn, &rules), Some(4));
}

#[test]
fn test_new_income_is_auto_categorized() {
    let rules = vec![make_rule(1, "freela", 8, 50)];
    let txn = make_txn(TxType::Income, "Freela projeto site");
    assert_eq!(category_for_new(&txn, &rules), Some(8));
}

#[test]
fn test_explicit_category_wins() {
    let rules = vec![make_rule(1, "netflix", 4, 100)];
    let mut txn = make_txn(TxType::Expense, "Netflix");
    txn.category_id = Some(6);
    assert_eq!(category_for_new(&txn, &rules), Some(6));
}

#[test]
fn test_transfer_never_categorized() {
    let rules = vec![make_rule(1, "poupança", 4, 100)];
    let txn = make_txn(TxType::Transfer, "Transferência poupança");
    assert_eq!(category_for_new(&txn, &rules), None);
}

#[test]
fn test_new_without_match_stays_uncategorized() {
    let rules = vec![make_rule(1, "uber", 2, 50)];
    let txn = make_txn(TxType::Expense, "Conta de luz");
    assert_eq!(category_for_new(&txn, &rules), None);
}
