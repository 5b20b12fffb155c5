//! Customer payment records service.

use anyhow::Result;
use chrono::Utc;
use log::info;

use shared::{
    generate_record_id, CreatePaymentRequest, Payment, PaymentFilter, PaymentStatistics,
    PaymentStatus, UpdatePaymentRequest,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{Connection, PaymentStorage};

pub struct PaymentService<C: Connection> {
    payments: C::Payments,
}

impl<C: Connection> PaymentService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            payments: connection.payments(),
        }
    }

    pub fn record_payment(&self, request: CreatePaymentRequest) -> Result<Payment> {
        info!(
            "Recording payment: customer={} amount={}",
            request.customer_name, request.amount
        );

        if request.customer_name.trim().is_empty()
            || request.activity.trim().is_empty()
            || request.activity_time.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }
        if request.amount <= 0.0 {
            return Err(validation("Amount must be greater than zero"));
        }

        let payment = Payment {
            id: generate_record_id(Utc::now().timestamp_millis()),
            customer_name: request.customer_name.trim().to_string(),
            activity: request.activity.trim().to_string(),
            activity_date: request.activity_date,
            activity_time: request.activity_time,
            payment_date: request.payment_date,
            method: request.method,
            amount: request.amount,
            status: request.status,
            notes: request.notes.trim().to_string(),
        };

        self.payments.upsert(&payment)?;
        info!("Recorded payment {} ({})", payment.id, payment.customer_name);
        Ok(payment)
    }

    pub fn update_payment(&self, id: &str, patch: UpdatePaymentRequest) -> Result<Payment> {
        let mut payment = self
            .payments
            .get(id)?
            .ok_or_else(|| not_found("Payment", id))?;

        if let Some(customer_name) = patch.customer_name {
            payment.customer_name = customer_name.trim().to_string();
        }
        if let Some(activity) = patch.activity {
            payment.activity = activity.trim().to_string();
        }
        if let Some(activity_date) = patch.activity_date {
            payment.activity_date = activity_date;
        }
        if let Some(activity_time) = patch.activity_time {
            payment.activity_time = activity_time;
        }
        if let Some(payment_date) = patch.payment_date {
            payment.payment_date = payment_date;
        }
        if let Some(method) = patch.method {
            payment.method = method;
        }
        if let Some(amount) = patch.amount {
            if amount <= 0.0 {
                return Err(validation("Amount must be greater than zero"));
            }
            payment.amount = amount;
        }
        if let Some(status) = patch.status {
            payment.status = status;
        }
        if let Some(notes) = patch.notes {
            payment.notes = notes.trim().to_string();
        }

        self.payments.upsert(&payment)?;
        info!("Updated payment {}", payment.id);
        Ok(payment)
    }

    pub fn delete_payment(&self, id: &str) -> Result<bool> {
        self.payments.delete(id)
    }

    pub fn get_payment(&self, id: &str) -> Result<Option<Payment>> {
        self.payments.get(id)
    }

    pub fn list_payments(&self) -> Result<Vec<Payment>> {
        self.payments.list()
    }

    /// Linear predicate scan over payment date and fields, order
    /// preserved from the store.
    pub fn filtered_payments(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        Ok(self
            .payments
            .list()?
            .into_iter()
            .filter(|payment| {
                if let Some(ref query) = search {
                    let haystack = format!(
                        "{} {} {}",
                        payment.customer_name, payment.activity, payment.notes
                    )
                    .to_lowercase();
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if let Some(method) = filter.method {
                    if payment.method != method {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if payment.status != status {
                        return false;
                    }
                }
                if let Some(date_from) = filter.date_from {
                    if payment.payment_date < date_from {
                        return false;
                    }
                }
                if let Some(date_to) = filter.date_to {
                    if payment.payment_date > date_to {
                        return false;
                    }
                }
                true
            })
            .collect())
    }

    /// Totals and counts by status.
    pub fn statistics(&self) -> Result<PaymentStatistics> {
        let payments = self.payments.list()?;

        let sum_for = |status: PaymentStatus| {
            payments
                .iter()
                .filter(|p| p.status == status)
                .map(|p| p.amount)
                .sum::<f64>()
        };
        let count_for =
            |status: PaymentStatus| payments.iter().filter(|p| p.status == status).count() as u32;

        Ok(PaymentStatistics {
            paid_total: sum_for(PaymentStatus::Paid),
            pending_total: sum_for(PaymentStatus::Pending),
            paid_count: count_for(PaymentStatus::Paid),
            pending_count: count_for(PaymentStatus::Pending),
            failed_count: count_for(PaymentStatus::Failed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonConnection;
    use shared::PaymentMethod;
    use tempfile::TempDir;

    fn setup() -> (PaymentService<JsonConnection>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (PaymentService::new(&connection), temp_dir)
    }

    fn request(customer: &str, amount: f64, status: PaymentStatus) -> CreatePaymentRequest {
        CreatePaymentRequest {
            customer_name: customer.to_string(),
            activity: "yoga".to_string(),
            activity_date: "2025-09-16".parse().unwrap(),
            activity_time: "18:32".to_string(),
            payment_date: "2025-09-10".parse().unwrap(),
            method: PaymentMethod::CreditCard,
            amount,
            status,
            notes: String::new(),
        }
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        let (service, _temp_dir) = setup();

        assert!(service
            .record_payment(request("John", 0.0, PaymentStatus::Paid))
            .is_err());
        assert!(service
            .record_payment(request("John", -5.0, PaymentStatus::Paid))
            .is_err());
        assert!(service.list_payments().unwrap().is_empty());
    }

    #[test]
    fn statistics_split_totals_by_status() {
        let (service, _temp_dir) = setup();

        service
            .record_payment(request("John", 45.0, PaymentStatus::Paid))
            .unwrap();
        service
            .record_payment(request("Alice", 30.0, PaymentStatus::Paid))
            .unwrap();
        service
            .record_payment(request("Bob", 25.0, PaymentStatus::Pending))
            .unwrap();

        let stats = service.statistics().unwrap();
        assert_eq!(stats.paid_total, 75.0);
        assert_eq!(stats.pending_total, 25.0);
        assert_eq!(stats.paid_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.failed_count, 0);
    }

    #[test]
    fn filters_narrow_by_method_and_date_window() {
        let (service, _temp_dir) = setup();

        let mut cash = request("Walkin", 10.0, PaymentStatus::Paid);
        cash.method = PaymentMethod::Cash;
        cash.payment_date = "2025-09-01".parse().unwrap();
        service.record_payment(cash).unwrap();
        service
            .record_payment(request("John", 45.0, PaymentStatus::Paid))
            .unwrap();

        let by_method = service
            .filtered_payments(&PaymentFilter {
                method: Some(PaymentMethod::Cash),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_method.len(), 1);
        assert_eq!(by_method[0].customer_name, "Walkin");

        let in_window = service
            .filtered_payments(&PaymentFilter {
                date_from: Some("2025-09-05".parse().unwrap()),
                date_to: Some("2025-09-30".parse().unwrap()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(in_window.len(), 1);
        assert_eq!(in_window[0].customer_name, "John");
    }

    #[test]
    fn update_preserves_unpatched_fields() {
        let (service, _temp_dir) = setup();
        let payment = service
            .record_payment(request("John", 45.0, PaymentStatus::Pending))
            .unwrap();

        let updated = service
            .update_payment(
                &payment.id,
                UpdatePaymentRequest {
                    status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, PaymentStatus::Paid);
        assert_eq!(updated.amount, 45.0);
        assert_eq!(updated.customer_name, "John");
    }
}
