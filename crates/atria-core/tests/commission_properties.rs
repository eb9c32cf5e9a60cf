use atria_core::{ContractCommissionPolicy, DealCommissionPolicy};
use atria_model::{ContractType, Money};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(512))]
    #[test]
    fn deal_cuts_always_sum_to_the_total(
        cents in 1i64..=1_000_000_000_000,
        has_captor in any::<bool>(),
    ) {
        let total = Money::from_cents(cents);
        let split = DealCommissionPolicy::split(total, has_captor);
        prop_assert_eq!(split.total(), total);
        prop_assert!(split.platform.cents() >= 0);
        prop_assert!(split.captor.cents() >= 0);
        prop_assert!(split.seller.cents() >= 0);
        if !has_captor {
            prop_assert_eq!(split.captor, Money::ZERO);
        }
    }
}

#[test]
fn contract_split_is_exhaustive_over_contract_types() {
    for contract_type in [ContractType::Platform, ContractType::External] {
        let split = ContractCommissionPolicy::split(contract_type);
        assert_eq!(split.total(), 100);
        assert_eq!(split.partner, 50, "partner share is fixed by policy");
        assert_eq!(
            split.captador == 0,
            contract_type == ContractType::Platform,
            "only external contracts owe a captador share"
        );
    }
}
