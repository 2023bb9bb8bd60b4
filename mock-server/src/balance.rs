//! Balance shared by every mock backend in the process.
//!
//! All access goes through one async mutex, so concurrent `deduct` calls
//! serialize and no update is lost.

use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

pub const DEFAULT_BALANCE: f64 = 1234.56;

#[derive(Debug, Clone)]
pub struct SharedBalance {
    inner: Arc<Mutex<f64>>,
}

impl Default for SharedBalance {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

impl SharedBalance {
    /// An isolated balance, independent of the process-wide one.
    pub fn new(initial: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// The process-wide balance, created on first use.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<SharedBalance> = OnceLock::new();
        GLOBAL.get_or_init(SharedBalance::default).clone()
    }

    pub async fn get(&self) -> f64 {
        *self.inner.lock().await
    }

    pub async fn set(&self, value: f64) {
        *self.inner.lock().await = value;
    }

    /// Subtract `amount` and return the balance after the deduction.
    pub async fn deduct(&self, amount: f64) -> f64 {
        let mut balance = self.inner.lock().await;
        *balance -= amount;
        *balance
    }

    pub async fn reset(&self) {
        self.set(DEFAULT_BALANCE).await;
    }
}
