//! Exports a user's transactions as an Excel spreadsheet.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{
    AppState, Error,
    money::decimal_to_f64,
    transaction::core::{Transaction, get_transactions_for_user},
    user::UserID,
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const REPORT_FILE_NAME: &str = "transactions.xlsx";
const REPORT_HEADERS: [&str; 6] = ["ID", "Title", "Amount", "Type", "Date", "Category"];

impl From<XlsxError> for Error {
    fn from(value: XlsxError) -> Self {
        Error::SpreadsheetError(value.to_string())
    }
}

/// Write `transactions` to a single worksheet, one row per transaction
/// below a bold header row.
fn write_report(transactions: &[Transaction]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Transactions")?;

    for (column, header) in (0u16..).zip(REPORT_HEADERS) {
        worksheet.write_string_with_format(0, column, header, &header_format)?;
    }

    for (row, transaction) in (1u32..).zip(transactions) {
        worksheet.write_number(row, 0, transaction.id as f64)?;
        worksheet.write_string(row, 1, &transaction.title)?;
        worksheet.write_number_with_format(
            row,
            2,
            decimal_to_f64(transaction.amount.as_decimal()),
            &amount_format,
        )?;
        worksheet.write_string(row, 3, transaction.transaction_type.label())?;
        worksheet.write_string(row, 4, transaction.date.to_string())?;
        worksheet.write_string(row, 5, &transaction.category)?;
    }

    worksheet.set_column_width(1, 30)?;
    worksheet.set_column_width(4, 12)?;
    worksheet.set_column_width(5, 20)?;

    workbook.save_to_buffer()
}

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct TransactionsReportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that downloads the logged in user's transactions as an
/// `.xlsx` file.
pub async fn get_transactions_report(
    State(state): State<TransactionsReportState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_for_user(user_id, &connection)?
    };

    let report = write_report(&transactions)
        .inspect_err(|error| tracing::error!("could not write transactions report: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        report,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use axum::{
        Extension,
        body::to_bytes,
        extract::{FromRef, State},
        http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    };
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        money::Amount,
        test_utils::{assert_status_ok, create_test_user, get_header, get_test_state},
        transaction::core::{NewTransaction, TransactionType, create_transaction},
    };

    use super::{TransactionsReportState, get_transactions_report, write_report};

    #[tokio::test]
    async fn report_is_xlsx_attachment() {
        let app_state = get_test_state();
        let user = {
            let connection = app_state.db_connection.lock().unwrap();
            let user = create_test_user("ada", &connection);
            create_transaction(
                user.id,
                NewTransaction {
                    title: "Salary".to_owned(),
                    amount: Amount::new(Decimal::from_str("1000").unwrap()).unwrap(),
                    transaction_type: TransactionType::Income,
                    date: date!(2026 - 10 - 01),
                    category: "Work".to_owned(),
                },
                &connection,
            )
            .unwrap();
            user
        };
        let state = TransactionsReportState::from_ref(&app_state);

        let response = get_transactions_report(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            get_header(&response, CONTENT_DISPOSITION.as_str()),
            "attachment; filename=\"transactions.xlsx\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // xlsx files are zip archives.
        assert!(body.starts_with(b"PK"));
    }

    #[test]
    fn empty_report_still_has_headers() {
        let report = write_report(&[]).unwrap();

        assert!(report.starts_with(b"PK"));
    }
}
