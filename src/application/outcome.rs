use crate::domain::payment::PaymentResult;
use crate::domain::ports::RawResponse;
use crate::domain::provider::ResponseContract;
use crate::error::{PaymentError, TransportError};
use serde_json::Value;
use tracing::{error, warn};

pub const FAULT_ERROR_CODE: i32 = 500;
pub const FAULT_ERROR_MESSAGE: &str = "Error approving payment";
pub const DECLINED_ERROR_MESSAGE: &str = "Payment declined by provider";

/// Converts a finished (or failed) exchange into a [`PaymentResult`].
///
/// This is where faults from below stop travelling as errors. Transport failures and
/// unreadable bodies all become `Failure { 500, "Error approving payment" }`.
pub struct OutcomeResolver;

impl OutcomeResolver {
    pub fn resolve(
        contract: &ResponseContract,
        exchange: Result<RawResponse, TransportError>,
    ) -> PaymentResult {
        let response = match exchange {
            Ok(response) => response,
            Err(fault) => return Self::fault(&PaymentError::Transport(fault)),
        };

        let body = match response.json_body() {
            Ok(body) => body,
            Err(e) => return Self::fault(&e),
        };

        if contract.indicates_success(response.status, &body) {
            match field_as_string(&body, &contract.payment_id_field) {
                Some(payment_id) => PaymentResult::Success { payment_id },
                None => Self::fault(&PaymentError::MalformedResponse(format!(
                    "success response without `{}`",
                    contract.payment_id_field
                ))),
            }
        } else {
            let failure = Self::declined(contract, response.status, &body);
            warn!(http_status = response.status, ?failure, "provider declined payment");
            failure
        }
    }

    fn fault(cause: &PaymentError) -> PaymentResult {
        error!(error = %cause, "Error approving payment");
        PaymentResult::failure(FAULT_ERROR_CODE, FAULT_ERROR_MESSAGE)
    }

    fn declined(contract: &ResponseContract, http_status: u16, body: &Value) -> PaymentResult {
        let error_code = contract
            .error_code_fields
            .iter()
            .find_map(|field| field_as_code(body, field))
            .unwrap_or(i32::from(http_status));

        let error_message = contract
            .error_message_fields
            .iter()
            .find_map(|field| field_as_string(body, field))
            .unwrap_or_else(|| match &contract.status_field {
                Some(field) => match field_as_string(body, field) {
                    Some(status) => format!("{DECLINED_ERROR_MESSAGE} (status: {status})"),
                    None => DECLINED_ERROR_MESSAGE.to_string(),
                },
                None => DECLINED_ERROR_MESSAGE.to_string(),
            });

        PaymentResult::Failure {
            error_code,
            error_message,
        }
    }
}

fn field_as_string(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an integer error code. Symbolic codes such as `"INVALID_REQUEST"` yield `None`.
fn field_as_code(body: &Value, field: &str) -> Option<i32> {
    match body.get(field)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
