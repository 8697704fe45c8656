use std::io::Write;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, enabled, info, Level};

use super::domain::{AccountId, PaymentStatus};
use super::scheduler::ProcessedAccount;

/// Caps how many account ids appear in a notification log line.
pub const MAX_LOGGED_ACCOUNT_IDS: usize = 5;

/// Outbound hook for high-priority accounts (message queue, partner sync, ...).
///
/// Implementations must accept an empty slice, returning a count of 0 without transmitting.
pub trait Notifier: Send + Sync {
    fn notify(&self, accounts: &[ProcessedAccount]) -> Result<NotificationReceipt, NotifierError>;
}

/// Number of accounts the notifier accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub count: usize,
}

impl NotificationReceipt {
    pub const fn empty() -> Self {
        Self { count: 0 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("failed to encode notification payload: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("failed to write notification payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalized entry consumed by partner reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerSyncItem {
    pub account_id: AccountId,
    pub internal_balance: Decimal,
    pub internal_status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

pub fn build_payload(accounts: &[ProcessedAccount], sent_at: DateTime<Utc>) -> Vec<PartnerSyncItem> {
    accounts
        .iter()
        .map(|account| PartnerSyncItem {
            account_id: account.account_id,
            internal_balance: account.debt_amount,
            internal_status: account.payment_status,
            processed_at: sent_at,
        })
        .collect()
}

fn leading_ids(payload: &[PartnerSyncItem]) -> Vec<AccountId> {
    payload
        .iter()
        .take(MAX_LOGGED_ACCOUNT_IDS)
        .map(|item| item.account_id)
        .collect()
}

/// Prototype adapter: logs the payload summary and transmits nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, accounts: &[ProcessedAccount]) -> Result<NotificationReceipt, NotifierError> {
        if accounts.is_empty() {
            return Ok(NotificationReceipt::empty());
        }

        let payload = build_payload(accounts, Utc::now());
        info!(
            count = accounts.len(),
            first_ids = ?leading_ids(&payload),
            "forwarding high-priority accounts to partner sync"
        );
        if enabled!(Level::DEBUG) {
            debug!(payload = %serde_json::to_string(&payload)?, "partner sync payload");
        }

        Ok(NotificationReceipt {
            count: accounts.len(),
        })
    }
}

/// One outbox line: a whole batch of high-priority accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEnvelope {
    pub sent_at: DateTime<Utc>,
    pub count: usize,
    pub items: Vec<PartnerSyncItem>,
}

/// Appends each batch as a JSON line to a writer, e.g. a file-backed outbox.
pub struct OutboxNotifier<W> {
    sink: Mutex<W>,
}

impl<W> OutboxNotifier<W>
where
    W: Write + Send,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn into_inner(self) -> W {
        match self.sink.into_inner() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W> Notifier for OutboxNotifier<W>
where
    W: Write + Send,
{
    fn notify(&self, accounts: &[ProcessedAccount]) -> Result<NotificationReceipt, NotifierError> {
        if accounts.is_empty() {
            return Ok(NotificationReceipt::empty());
        }

        let sent_at = Utc::now();
        let items = build_payload(accounts, sent_at);
        let envelope = OutboxEnvelope {
            sent_at,
            count: items.len(),
            items,
        };
        let line = serde_json::to_string(&envelope)?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| NotifierError::Transport("outbox writer poisoned".to_string()))?;
        writeln!(sink, "{line}")?;
        sink.flush()?;

        info!(
            count = envelope.count,
            first_ids = ?leading_ids(&envelope.items),
            "high-priority batch written to outbox"
        );

        Ok(NotificationReceipt {
            count: envelope.count,
        })
    }
}
