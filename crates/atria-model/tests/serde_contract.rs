use atria_model::{
    Actor, Contract, ContractId, ContractStatus, ContractType, Money, PropertyId, Role, UserId,
    TOTAL_COMMISSION_BP,
};
use chrono::{DateTime, Utc};

fn ts() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

#[test]
fn ids_serialize_transparently() {
    let id = PropertyId::parse("p-1").expect("property id");
    assert_eq!(serde_json::to_string(&id).expect("json"), "\"p-1\"");
    let back: PropertyId = serde_json::from_str("\"p-1\"").expect("decode");
    assert_eq!(back, id);
}

#[test]
fn money_serializes_as_integer_cents() {
    let money = Money::from_cents(123_456);
    assert_eq!(serde_json::to_string(&money).expect("json"), "123456");
}

#[test]
fn status_enums_use_lowercase_wire_strings() {
    assert_eq!(
        serde_json::to_string(&ContractStatus::Signed).expect("json"),
        "\"signed\""
    );
    assert_eq!(
        serde_json::to_string(&ContractType::External).expect("json"),
        "\"external\""
    );
    assert_eq!(serde_json::to_string(&Role::Admin).expect("json"), "\"admin\"");
}

#[test]
fn contract_round_trips_and_rejects_unknown_fields() {
    let contract = Contract {
        id: ContractId::parse("c-1").expect("id"),
        property_id: PropertyId::parse("p-1").expect("property"),
        captador_id: None,
        partner_id: UserId::parse("partner-1").expect("partner"),
        contract_type: ContractType::Platform,
        captador_percentage: 0,
        partner_percentage: 50,
        platform_percentage: 50,
        total_commission_bp: TOTAL_COMMISSION_BP,
        property_value: Money::from_cents(50_000_000),
        terms_and_conditions: None,
        status: ContractStatus::Signed,
        signed_at: Some(ts()),
        created_at: ts(),
    };
    let encoded = serde_json::to_string(&contract).expect("encode");
    let decoded: Contract = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(decoded, contract);

    let mut value: serde_json::Value = serde_json::from_str(&encoded).expect("value");
    value["unexpected"] = serde_json::json!(true);
    let spiked = serde_json::to_string(&value).expect("spiked");
    assert!(serde_json::from_str::<Contract>(&spiked).is_err());
}

#[test]
fn actor_decodes_from_identity_payload() {
    let actor: Actor =
        serde_json::from_str(r#"{"id":"admin-1","role":"admin"}"#).expect("actor");
    assert!(actor.is_admin());
    assert_eq!(actor.id, UserId::parse("admin-1").expect("id"));
}
