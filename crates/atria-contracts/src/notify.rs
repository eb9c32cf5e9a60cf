//! Notification payload builders for lifecycle events.

use atria_core::{Notification, NotificationKind};
use atria_model::{Contract, ContractRequest};
use serde_json::json;

pub(crate) fn request_received(request: &ContractRequest) -> Notification {
    Notification {
        user_id: request.owner_id.clone(),
        title: "New contract request".to_string(),
        message: format!(
            "{} wants to represent your property {}",
            request.requester_id.as_str(),
            request.property_id.as_str()
        ),
        kind: NotificationKind::RequestReceived,
        data: Some(json!({
            "requestId": request.id.as_str(),
            "propertyId": request.property_id.as_str(),
        })),
    }
}

pub(crate) fn request_approved(request: &ContractRequest, contract: &Contract) -> Notification {
    Notification {
        user_id: request.requester_id.clone(),
        title: "Contract request approved".to_string(),
        message: format!(
            "Your request for property {} was approved; contract {} is signed",
            request.property_id.as_str(),
            contract.id.as_str()
        ),
        kind: NotificationKind::RequestApproved,
        data: Some(json!({
            "requestId": request.id.as_str(),
            "contractId": contract.id.as_str(),
            "contractType": contract.contract_type.as_str(),
        })),
    }
}

pub(crate) fn request_rejected(request: &ContractRequest, reason: Option<&str>) -> Notification {
    let message = match reason {
        Some(reason) => format!(
            "Your request for property {} was rejected: {reason}",
            request.property_id.as_str()
        ),
        None => format!(
            "Your request for property {} was rejected",
            request.property_id.as_str()
        ),
    };
    Notification {
        user_id: request.requester_id.clone(),
        title: "Contract request rejected".to_string(),
        message,
        kind: NotificationKind::RequestRejected,
        data: Some(json!({
            "requestId": request.id.as_str(),
            "propertyId": request.property_id.as_str(),
        })),
    }
}
