//! Payment service
//!
//! Students claim a month's fee as paid; a reviewer approves (granting credits) or rejects
//! (notifying the student). Approval credits the ledger in the same write that moves the
//! payment out of pending, so a payment can never be credited twice.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::app::credit_policy::CreditGrantPolicy;
use crate::app::ledger_service::{credit_entry, local_day};
use crate::domain::entities::{
    month_label, NewPayment, Notification, Payment, PaymentDecision, PaymentId, PaymentStatus,
    ReasonTag, StudentId,
};
use crate::domain::ports::{
    Clock, EnrollmentRepository, NotificationChannel, PaymentRepository, StudentDirectory,
};
use crate::error::{AppError, DomainError};

/// Result of a payment decision
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub payment: Payment,
    /// Credits granted, for approvals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credited: Option<i32>,
    /// Message dispatched to the student, for rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

/// Result of a fee reminder run
#[derive(Debug, Clone, Serialize)]
pub struct ReminderReport {
    pub month_for: String,
    pub reminders: Vec<Notification>,
    pub delivered: usize,
}

/// Service for the payment state machine
pub struct PaymentService<PR, ER, SD, NC, CL>
where
    PR: PaymentRepository + ?Sized,
    ER: EnrollmentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    NC: NotificationChannel + ?Sized,
    CL: Clock + ?Sized,
{
    payments: Arc<PR>,
    enrollments: Arc<ER>,
    directory: Arc<SD>,
    notifier: Arc<NC>,
    clock: Arc<CL>,
    policy: CreditGrantPolicy,
    utc_offset: FixedOffset,
}

impl<PR, ER, SD, NC, CL> PaymentService<PR, ER, SD, NC, CL>
where
    PR: PaymentRepository + ?Sized,
    ER: EnrollmentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    NC: NotificationChannel + ?Sized,
    CL: Clock + ?Sized,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payments: Arc<PR>,
        enrollments: Arc<ER>,
        directory: Arc<SD>,
        notifier: Arc<NC>,
        clock: Arc<CL>,
        policy: CreditGrantPolicy,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            payments,
            enrollments,
            directory,
            notifier,
            clock,
            policy,
            utc_offset,
        }
    }

    fn today(&self) -> NaiveDate {
        local_day(self.clock.now(), self.utc_offset)
    }

    /// The fee month containing today
    pub fn current_month(&self) -> String {
        month_label(self.today())
    }

    /// Record a student's claim that a month's fee was paid
    ///
    /// The month defaults to the current one.
    pub async fn claim(
        &self,
        student_id: StudentId,
        month_for: Option<String>,
        amount_paid: i64,
    ) -> Result<Payment, AppError> {
        if amount_paid < 0 {
            return Err(DomainError::Validation("Amount paid cannot be negative".to_string()).into());
        }
        let month_for = match month_for {
            Some(month) if month.trim().is_empty() => {
                return Err(DomainError::Validation("Month cannot be empty".to_string()).into())
            }
            Some(month) => month.trim().to_string(),
            None => self.current_month(),
        };

        if self.directory.find_by_id(&student_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Student {} not found", student_id)).into());
        }

        let already_claimed = self
            .payments
            .find_by_student(&student_id)
            .await?
            .iter()
            .any(|p| p.is_pending() && p.month_for == month_for);
        if already_claimed {
            return Err(DomainError::DuplicateAction(format!(
                "A payment for {} is already awaiting review",
                month_for
            ))
            .into());
        }

        let payment = self
            .payments
            .create(&NewPayment {
                student_id,
                month_for,
                amount_paid,
            })
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            student_id = %student_id,
            month_for = %payment.month_for,
            "Payment claimed"
        );

        Ok(payment)
    }

    /// Approve or reject a pending payment
    pub async fn decide(
        &self,
        id: &PaymentId,
        decision: PaymentDecision,
    ) -> Result<DecisionOutcome, AppError> {
        let payment = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Payment {} not found", id)))?;
        if !payment.is_pending() {
            return Err(DomainError::DuplicateAction(format!(
                "Payment {} is already {}",
                id, payment.status
            ))
            .into());
        }

        match decision {
            PaymentDecision::Approve => self.approve(payment).await,
            PaymentDecision::Reject => self.reject(payment).await,
        }
    }

    async fn approve(&self, payment: Payment) -> Result<DecisionOutcome, AppError> {
        let active = self
            .enrollments
            .find_active_by_student(&payment.student_id)
            .await?
            .len();
        let amount = self.policy.grant_amount(active);
        let credit = credit_entry(
            payment.student_id,
            amount,
            ReasonTag::payment_credit(payment.id),
            self.today(),
        )?;

        let approved = self
            .payments
            .decide(&payment.id, PaymentStatus::Approved, Some(&credit))
            .await?;

        tracing::info!(
            payment_id = %approved.id,
            student_id = %approved.student_id,
            credits = amount,
            "Payment approved"
        );

        Ok(DecisionOutcome {
            payment: approved,
            credited: Some(amount),
            notification: None,
        })
    }

    async fn reject(&self, payment: Payment) -> Result<DecisionOutcome, AppError> {
        let rejected = self
            .payments
            .decide(&payment.id, PaymentStatus::Rejected, None)
            .await?;

        tracing::info!(
            payment_id = %rejected.id,
            student_id = %rejected.student_id,
            "Payment rejected"
        );

        // The rejection is committed; a notification failure must not undo it
        let notification = match self.directory.find_by_id(&rejected.student_id).await {
            Ok(Some(profile)) => {
                let notification = Notification::payment_rejected(&profile, &rejected.month_for);
                self.dispatch(&notification).await;
                Some(notification)
            }
            Ok(None) => {
                tracing::warn!(
                    student_id = %rejected.student_id,
                    "No directory profile, rejection notice not sent"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    student_id = %rejected.student_id,
                    error = %e,
                    "Directory lookup failed, rejection notice not sent"
                );
                None
            }
        };

        Ok(DecisionOutcome {
            payment: rejected,
            credited: None,
            notification,
        })
    }

    /// Payments awaiting review, oldest first
    pub async fn pending(&self) -> Result<Vec<Payment>, AppError> {
        Ok(self.payments.find_by_status(PaymentStatus::Pending).await?)
    }

    /// A student's payments, newest first
    pub async fn history(&self, student_id: &StudentId) -> Result<Vec<Payment>, AppError> {
        Ok(self.payments.find_by_student(student_id).await?)
    }

    /// Reminders for actively enrolled students with nothing paid or claimed for a month
    pub async fn fee_reminders(&self, month_for: &str) -> Result<Vec<Notification>, AppError> {
        let roster = self.enrollments.active_roster().await?;
        let enrolled: BTreeSet<StudentId> =
            roster.enrollments.iter().map(|e| e.student_id).collect();

        let mut settled: HashSet<StudentId> = self
            .payments
            .find_approved_for_month(month_for)
            .await?
            .into_iter()
            .map(|p| p.student_id)
            .collect();
        settled.extend(
            self.payments
                .find_by_status(PaymentStatus::Pending)
                .await?
                .into_iter()
                .filter(|p| p.month_for == month_for)
                .map(|p| p.student_id),
        );

        let mut reminders = Vec::new();
        for student_id in enrolled.into_iter().filter(|s| !settled.contains(s)) {
            match self.directory.find_by_id(&student_id).await? {
                Some(profile) => reminders.push(Notification::fee_reminder(&profile, month_for)),
                None => tracing::warn!(
                    student_id = %student_id,
                    "Enrolled student missing from directory, skipping reminder"
                ),
            }
        }

        Ok(reminders)
    }

    /// Build and dispatch fee reminders for a month (the current one by default)
    pub async fn send_fee_reminders(
        &self,
        month_for: Option<String>,
    ) -> Result<ReminderReport, AppError> {
        let month_for = month_for.unwrap_or_else(|| self.current_month());
        let reminders = self.fee_reminders(&month_for).await?;

        let mut delivered = 0;
        for reminder in &reminders {
            if self.dispatch(reminder).await {
                delivered += 1;
            }
        }

        tracing::info!(
            month_for = %month_for,
            reminders = reminders.len(),
            delivered,
            "Fee reminders dispatched"
        );

        Ok(ReminderReport {
            month_for,
            reminders,
            delivered,
        })
    }

    async fn dispatch(&self, notification: &Notification) -> bool {
        match self.notifier.send(notification).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    student_id = %notification.target_student_id,
                    error = %e,
                    "Failed to deliver notification"
                );
                false
            }
        }
    }
}
