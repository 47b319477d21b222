//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    flash::{FlashMessage, set_flash},
    transaction::{
        core::create_transaction,
        form::{TransactionFormData, transaction_form},
    },
    user::UserID,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<CreateTransactionState> for Key {
    fn from_ref(state: &CreateTransactionState) -> Self {
        state.cookie_key.clone()
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
///
/// Invalid input re-renders the form with an error message under each
/// offending field.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let new_transaction = match form.validate() {
        Ok(new_transaction) => new_transaction,
        Err(errors) => return transaction_form(&form, &errors).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(user_id, new_transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    let jar = set_flash(jar, &FlashMessage::success("Transaction added successfully."));

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        jar,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use axum_extra::extract::{Form, PrivateCookieJar};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_status_ok, create_test_user,
            get_test_state, must_get_form, parse_html_fragment,
        },
        transaction::{
            core::{TransactionType, get_transactions_for_user},
            form::TransactionFormData,
        },
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn form_data(amount: &str) -> TransactionFormData {
        TransactionFormData {
            title: "Salary".to_owned(),
            amount: amount.to_owned(),
            transaction_type: "income".to_owned(),
            date: "2026-10-01".to_owned(),
            category: "Work".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let app_state = get_test_state();
        let user = create_test_user("ada", &app_state.db_connection.lock().unwrap());
        let state = CreateTransactionState::from_ref(&app_state);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = create_transaction_endpoint(
            State(state),
            Extension(user.id),
            jar,
            Form(form_data("1000")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(
            response
                .headers()
                .get_all("set-cookie")
                .iter()
                .any(|header| header.to_str().unwrap().starts_with("flash="))
        );

        let transactions =
            get_transactions_for_user(user.id, &app_state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Salary");
        assert_eq!(transactions[0].amount.to_string(), "1000.00");
        assert_eq!(transactions[0].transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn invalid_amount_re_renders_form() {
        let app_state = get_test_state();
        let user = create_test_user("ada", &app_state.db_connection.lock().unwrap());
        let state = CreateTransactionState::from_ref(&app_state);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = create_transaction_endpoint(
            State(state),
            Extension(user.id),
            jar,
            Form(form_data("-5")),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "amount", "Amount cannot be negative.");

        let transactions =
            get_transactions_for_user(user.id, &app_state.db_connection.lock().unwrap()).unwrap();
        assert!(transactions.is_empty());
    }
}
