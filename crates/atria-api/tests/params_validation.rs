use atria_api::dto::DecideRequestDto;
use atria_api::params::{
    parse_contract_filter, parse_decision, parse_page, parse_repayment_filter,
    parse_request_filter,
};
use atria_contracts::Decision;
use atria_core::ErrorKind;
use atria_model::{ContractStatus, RequestStatus};
use std::collections::HashMap;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn page_defaults_and_bounds() {
    let page = parse_page(&query(&[]), 50, 200).expect("defaults");
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 50);

    let page = parse_page(&query(&[("page", "3"), ("limit", "25")]), 50, 200).expect("explicit");
    assert_eq!(page.page, 3);
    assert_eq!(page.limit, 25);
    assert_eq!(page.offset(), 50);

    for bad in [("page", "0"), ("page", "x"), ("limit", "0"), ("limit", "201")] {
        let err = parse_page(&query(&[bad]), 50, 200).expect_err("rejected");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[test]
fn filters_parse_known_statuses_and_reject_junk() {
    let filter =
        parse_request_filter(&query(&[("status", "pending"), ("propertyId", "p-1")]))
            .expect("filter");
    assert_eq!(filter.status, Some(RequestStatus::Pending));
    assert_eq!(filter.property_id.as_ref().map(|p| p.as_str()), Some("p-1"));

    assert!(parse_request_filter(&query(&[("status", "bogus")])).is_err());

    let filter = parse_contract_filter(&query(&[("status", "signed"), ("userId", "u-1")]))
        .expect("filter");
    assert_eq!(filter.status, Some(ContractStatus::Signed));
    assert_eq!(filter.party.as_ref().map(|p| p.as_str()), Some("u-1"));

    assert!(parse_repayment_filter(&query(&[("status", "overdue")])).is_err());
    let filter = parse_repayment_filter(&query(&[("status", "outstanding")])).expect("filter");
    assert!(filter.captador_id.is_none());
}

#[test]
fn decision_actions_are_a_closed_set() {
    let approve = parse_decision(DecideRequestDto {
        action: "approve".to_string(),
        reason: None,
    })
    .expect("approve");
    assert_eq!(approve, Decision::Approve);

    let reject = parse_decision(DecideRequestDto {
        action: "reject".to_string(),
        reason: Some("too far".to_string()),
    })
    .expect("reject");
    assert_eq!(
        reject,
        Decision::Reject {
            reason: Some("too far".to_string())
        }
    );

    let err = parse_decision(DecideRequestDto {
        action: "cancel".to_string(),
        reason: None,
    })
    .expect_err("unknown action");
    assert_eq!(err.kind(), ErrorKind::Validation);
}
